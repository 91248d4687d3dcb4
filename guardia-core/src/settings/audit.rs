use serde::Deserialize;

/// Audit trail policy. With `fail_closed` unset a failed append is logged
/// and swallowed, trading possible audit gaps for availability of the
/// business operation; setting it makes the append failure surface to the
/// caller instead.
#[derive(Debug, Deserialize, Clone, Default)]
#[allow(unused)]
#[readonly::make]
pub struct AuditSettings {
    #[serde(default)]
    pub fail_closed: bool,
}

impl AuditSettings {
    pub fn new(fail_closed: bool) -> Self {
        AuditSettings { fail_closed }
    }
}
