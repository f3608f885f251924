//! UseCase 層
//!
//! ビジネスロジックを実装するレイヤー。
//! UI 層から呼び出され、Domain 層を操作します。

pub mod disconnect_connection;
pub mod error;
pub mod identify_participant;
pub mod list_participants;
pub mod relay_signal;

pub use disconnect_connection::DisconnectConnectionUseCase;
pub use error::{IdentifyError, RelayError};
pub use identify_participant::{IdentifyOutcome, IdentifyParticipantUseCase};
pub use list_participants::{ListParticipantsUseCase, ParticipantPresence};
pub use relay_signal::RelaySignalUseCase;
