mod contract;
mod conversation;
mod flat;
mod profile;
mod search;
mod swap_match;

pub use contract::{Contract, ContractStatus, ContractSummary, NewContract};
pub use conversation::{Conversation, Message, NewConversation, NewMessage};
pub use flat::{Flat, NewFlat};
pub use profile::{Profile, ProfileInput};
pub use search::{NewSearch, Search};
pub use swap_match::{
    MatchKind, MatchParticipant, MatchProperty, MatchStatus, SwapMatch, count_by_status, filter_matches,
};
