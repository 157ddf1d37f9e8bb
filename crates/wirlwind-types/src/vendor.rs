/// Stable lowercase vendor identifier (§3), e.g. `cisco_ios`, `cisco_ios_xe`,
/// `arista_eos`, `juniper_junos`, `cisco_nxos`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct VendorId(String);

impl VendorId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into().to_lowercase())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Strip a single trailing `_segment`, returning `None` if there is no
    /// further segment to strip (§3: "Fallback applies at most once per
    /// lookup").
    pub fn fallback(&self) -> Option<VendorId> {
        let (head, _tail) = self.0.rsplit_once('_')?;
        if head.is_empty() {
            None
        } else {
            Some(VendorId(head.to_string()))
        }
    }
}

impl std::fmt::Display for VendorId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for VendorId {
    fn from(s: &str) -> Self {
        VendorId::new(s)
    }
}

impl From<String> for VendorId {
    fn from(s: String) -> Self {
        VendorId::new(s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fallback_strips_one_trailing_segment() {
        let xe = VendorId::new("cisco_ios_xe");
        assert_eq!(xe.fallback().unwrap().as_str(), "cisco_ios");
    }

    #[test]
    fn fallback_applies_at_most_once() {
        let ios = VendorId::new("cisco_ios");
        let once = ios.fallback().unwrap();
        assert_eq!(once.as_str(), "cisco");
        // A second application is the caller's choice, not automatic; the
        // type itself never chains fallbacks.
    }

    #[test]
    fn fallback_none_for_single_segment() {
        assert!(VendorId::new("arista").fallback().is_none());
    }

    #[test]
    fn normalizes_to_lowercase() {
        assert_eq!(VendorId::new("Cisco_IOS_XE").as_str(), "cisco_ios_xe");
    }
}
