//! Server state and connection management.

use std::sync::Arc;

use crate::usecase::{
    DisconnectConnectionUseCase, IdentifyParticipantUseCase, ListParticipantsUseCase,
    RelaySignalUseCase,
};

/// Shared application state
pub struct AppState {
    pub identify_participant_usecase: Arc<IdentifyParticipantUseCase>,
    pub relay_signal_usecase: Arc<RelaySignalUseCase>,
    pub disconnect_connection_usecase: Arc<DisconnectConnectionUseCase>,
    pub list_participants_usecase: Arc<ListParticipantsUseCase>,
}
