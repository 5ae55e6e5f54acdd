use cosmwasm_schema::cw_serde;

/// Sale phase derived from the opening time and the two sale windows.
#[cw_serde]
#[derive(Copy)]
pub enum Phase {
    /// Opening time unset, or not reached yet.
    Unscheduled,
    /// Allowlist-only minting window.
    Vip,
    /// Public ticketing window.
    Public,
    /// Everything after the public window.
    Closed,
}

impl Phase {
    pub fn as_str(&self) -> &'static str {
        match self {
            Phase::Unscheduled => "unscheduled",
            Phase::Vip => "vip",
            Phase::Public => "public",
            Phase::Closed => "closed",
        }
    }
}
