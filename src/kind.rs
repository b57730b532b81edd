//! Probe-kind classification
//!
//! Probe names follow a `<kind>__<role>` convention, e.g. `io__entry` and
//! `io__return` both belong to kind `io`. A kind can be synthesized only when
//! it has exactly two member probes, one carrying a start token and the other
//! an end token.
//!
//! Roles are taken from which token group a member matches, never from the
//! order in which probes first showed up in the data. An `io__return` probe
//! that happens to fire before any `io__entry` is still the end of the pair.

use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

/// Delimiter between a probe's kind and its role suffix
pub const PROBE_DELIM: &str = "__";

/// Substrings marking the probe that opens an operation
pub const START_TOKENS: [&str; 2] = ["begin", "entry"];

/// Substrings marking the probe that closes an operation
pub const END_TOKENS: [&str; 2] = ["end", "return"];

/// Which side of an operation a probe marks
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Role {
    Start,
    End,
}

impl Role {
    fn tokens(self) -> &'static [&'static str] {
        match self {
            Role::Start => &START_TOKENS,
            Role::End => &END_TOKENS,
        }
    }

    /// Whether `text` contains any of this role's tokens
    pub fn matches(self, text: &str) -> bool {
        self.tokens().iter().any(|token| text.contains(token))
    }
}

/// Kind name of a probe: everything before the final `__` segment
///
/// Returns an empty string for names without a delimiter.
pub fn kind_name(probe: &str) -> String {
    let segments: Vec<&str> = probe.split(PROBE_DELIM).collect();
    segments[..segments.len() - 1].join(PROBE_DELIM)
}

/// Final `__` segment of a probe name
fn role_suffix(probe: &str) -> &str {
    probe.split(PROBE_DELIM).last().unwrap_or(probe)
}

/// A synthesizable begin/end probe pair
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ProbeKind {
    pub name: String,
    start: String,
    end: String,
}

impl ProbeKind {
    pub fn start(&self) -> &str {
        &self.start
    }

    pub fn end(&self) -> &str {
        &self.end
    }

    pub fn member(&self, role: Role) -> &str {
        match role {
            Role::Start => self.start.as_str(),
            Role::End => self.end.as_str(),
        }
    }

    /// Both members tagged with their roles
    pub fn members(&self) -> [(Role, &str); 2] {
        [(Role::Start, self.start.as_str()), (Role::End, self.end.as_str())]
    }
}

/// Why a kind was excluded from synthesis
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Rejection {
    /// Probes without a `__` delimiter
    EmptyKindName,
    /// Anything other than exactly two member probes
    MemberCount(usize),
    /// Members don't split into one start-token and one end-token probe
    TokenMismatch,
    /// Either member could play either role
    AmbiguousRoles,
}

impl fmt::Display for Rejection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Rejection::EmptyKindName => {
                write!(f, "probe names carry no '{}' delimiter", PROBE_DELIM)
            }
            Rejection::MemberCount(n) => write!(f, "expected 2 member probes, found {}", n),
            Rejection::TokenMismatch => write!(
                f,
                "members must match one of {:?} and one of {:?}",
                START_TOKENS, END_TOKENS
            ),
            Rejection::AmbiguousRoles => write!(f, "start/end roles are ambiguous"),
        }
    }
}

/// Outcome of classifying every observed probe name
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Classification {
    pub kinds: Vec<ProbeKind>,
    /// Rejected kinds with their members and reason
    pub rejected: Vec<(String, Vec<String>, Rejection)>,
}

/// Assign roles to a two-member kind
///
/// Both members share the kind name, so their final segments are what tells
/// them apart: when both suffixes carry tokens of the same group the kind is
/// rejected, even if a token inside the kind name would make a pairing fit.
fn assign_roles(a: &str, b: &str) -> Result<(String, String), Rejection> {
    let (sa, sb) = (role_suffix(a), role_suffix(b));
    let shares_group = |role: Role| role.matches(sa) && role.matches(sb);
    if shares_group(Role::Start) || shares_group(Role::End) {
        return Err(Rejection::TokenMismatch);
    }

    let fits = |start: &str, end: &str| Role::Start.matches(start) && Role::End.matches(end);
    match (fits(a, b), fits(b, a)) {
        (true, false) => Ok((a.to_string(), b.to_string())),
        (false, true) => Ok((b.to_string(), a.to_string())),
        (false, false) => Err(Rejection::TokenMismatch),
        (true, true) => {
            // Kind names like `append_entry` carry both groups' tokens; the suffix decides
            match (fits(sa, sb), fits(sb, sa)) {
                (true, false) => Ok((a.to_string(), b.to_string())),
                (false, true) => Ok((b.to_string(), a.to_string())),
                _ => Err(Rejection::AmbiguousRoles),
            }
        }
    }
}

/// Group probe names into kinds and report why each rejected kind failed
pub fn classify_detailed<'a, I>(probe_names: I) -> Classification
where
    I: IntoIterator<Item = &'a str>,
{
    let mut groups: BTreeMap<String, BTreeSet<&str>> = BTreeMap::new();
    for probe in probe_names {
        groups.entry(kind_name(probe)).or_default().insert(probe);
    }

    let mut result = Classification::default();
    for (name, members) in groups {
        let outcome = if name.is_empty() {
            Err(Rejection::EmptyKindName)
        } else if members.len() != 2 {
            Err(Rejection::MemberCount(members.len()))
        } else {
            let mut it = members.iter();
            match (it.next(), it.next()) {
                (Some(a), Some(b)) => assign_roles(a, b),
                _ => Err(Rejection::MemberCount(members.len())),
            }
        };

        match outcome {
            Ok((start, end)) => {
                tracing::debug!(kind = %name, %start, %end, "synthesizable probe kind");
                result.kinds.push(ProbeKind { name, start, end });
            }
            Err(reason) => {
                let members: Vec<String> = members.iter().map(|m| m.to_string()).collect();
                if reason != Rejection::EmptyKindName {
                    tracing::warn!(
                        kind = %name,
                        members = ?members,
                        "skipping probe kind: {}",
                        reason
                    );
                }
                result.rejected.push((name, members, reason));
            }
        }
    }

    result
}

/// Synthesizable kinds among the given probe names, sorted by kind name
pub fn classify<'a, I>(probe_names: I) -> Vec<ProbeKind>
where
    I: IntoIterator<Item = &'a str>,
{
    classify_detailed(probe_names).kinds
}
