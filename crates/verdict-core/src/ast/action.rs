//! Decision actions and their restriction order

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Action produced by a rule, a domain, or a final decision
///
/// Variants are declared most restrictive first, so the derived `Ord` is the
/// restriction order: `Block < Redirect < Restrict < Allow`. The minimum of a
/// set of actions is the most restrictive one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Action {
    /// Refuse the request outright
    Block,
    /// Send the request elsewhere (e.g. a professional resource)
    Redirect,
    /// Proceed with limitations (disclaimers, reduced capability)
    Restrict,
    /// Proceed
    Allow,
}

impl Action {
    /// All actions, most restrictive first
    pub const ALL: [Action; 4] = [Action::Block, Action::Redirect, Action::Restrict, Action::Allow];

    /// Fixed priority number: `{block:0, redirect:1, restrict:2, allow:3}`
    pub fn priority(&self) -> u8 {
        match self {
            Action::Block => 0,
            Action::Redirect => 1,
            Action::Restrict => 2,
            Action::Allow => 3,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Action::Block => "block",
            Action::Redirect => "redirect",
            Action::Restrict => "restrict",
            Action::Allow => "allow",
        }
    }

    /// Strictly more restrictive than `other`
    pub fn is_stricter_than(&self, other: Action) -> bool {
        self.priority() < other.priority()
    }

    /// Most restrictive action of the iterator, `None` when empty
    pub fn most_restrictive<I>(actions: I) -> Option<Action>
    where
        I: IntoIterator<Item = Action>,
    {
        actions.into_iter().min()
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Action {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "block" => Ok(Action::Block),
            "redirect" => Ok(Action::Redirect),
            "restrict" => Ok(Action::Restrict),
            "allow" => Ok(Action::Allow),
            other => Err(format!("unknown action '{}'", other)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_action_priority_mapping() {
        assert_eq!(Action::Block.priority(), 0);
        assert_eq!(Action::Redirect.priority(), 1);
        assert_eq!(Action::Restrict.priority(), 2);
        assert_eq!(Action::Allow.priority(), 3);
    }

    #[test]
    fn test_action_order_matches_priority() {
        for a in Action::ALL {
            for b in Action::ALL {
                assert_eq!(a.cmp(&b), a.priority().cmp(&b.priority()));
            }
        }
    }

    #[test]
    fn test_most_restrictive() {
        let actions = [Action::Allow, Action::Restrict, Action::Block, Action::Redirect];
        assert_eq!(Action::most_restrictive(actions), Some(Action::Block));
        assert_eq!(Action::most_restrictive(Vec::new()), None);
    }

    #[test]
    fn test_action_parse_and_serde() {
        assert_eq!("Block".parse::<Action>(), Ok(Action::Block));
        assert!("deny".parse::<Action>().is_err());
        assert_eq!(serde_json::to_string(&Action::Restrict).unwrap(), "\"restrict\"");
    }
}
