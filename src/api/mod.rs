// External API gateway — the scoring service's HTTP contract.
//
// The detection logic itself (DNS/auth checks, AI content analysis,
// scoring) runs entirely in the remote service. This module only speaks
// its wire format.

pub mod client;
pub mod traits;
pub mod types;
