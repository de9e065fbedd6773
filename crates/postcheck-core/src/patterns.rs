//! Red-flag pattern registry.
//!
//! A fixed, ordered table of scam indicators. Each category is backed by one
//! or more regex rules that run against the lower-cased posting text.
//!
//! The registry is built once on first use and never mutated afterwards, so it
//! can be shared between threads without locking.

use lazy_static::lazy_static;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt;

/// A named class of scam indicator.
///
/// Variants are declared in registry order; `Ord` follows that order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RedFlag {
    /// Payment or charge solicitation
    Fee,
    /// Off-platform messaging handoff
    Whatsapp,
    /// Free consumer email domains used as the official contact
    PersonalContact,
    /// Generic high-urgency, no-qualification language
    Vague,
    /// Unrealistic compensation claims
    HighPay,
}

impl RedFlag {
    /// All categories in registry order.
    pub const ALL: [RedFlag; 5] = [
        RedFlag::Fee,
        RedFlag::Whatsapp,
        RedFlag::PersonalContact,
        RedFlag::Vague,
        RedFlag::HighPay,
    ];

    /// Stable identifier used in output and logs.
    pub fn name(&self) -> &'static str {
        match self {
            RedFlag::Fee => "fee",
            RedFlag::Whatsapp => "whatsapp",
            RedFlag::PersonalContact => "personal_contact",
            RedFlag::Vague => "vague",
            RedFlag::HighPay => "high_pay",
        }
    }

    /// Fixed explanation emitted when this category triggers.
    pub fn reason(&self) -> &'static str {
        match self {
            RedFlag::Fee => "Mentions fees/payments (red flag).",
            RedFlag::Whatsapp => "Contact via messaging apps detected (WhatsApp/Telegram).",
            RedFlag::PersonalContact => "Personal email domains present instead of corporate.",
            RedFlag::Vague => "Role description is vague or unrealistic.",
            RedFlag::HighPay => "Promised high pay or vague stipend phrase.",
        }
    }
}

impl fmt::Display for RedFlag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// One registry entry: a category and its ordered matchers.
#[derive(Debug)]
pub struct RedFlagCategory {
    pub flag: RedFlag,
    pub matchers: Vec<Regex>,
}

impl RedFlagCategory {
    /// True if any matcher hits. Stops at the first hit.
    ///
    /// `lowered` must already be lower-cased.
    pub fn matches(&self, lowered: &str) -> bool {
        self.matchers.iter().any(|m| m.is_match(lowered))
    }

    /// Category name, same as `self.flag.name()`.
    pub fn name(&self) -> &'static str {
        self.flag.name()
    }
}

lazy_static! {
    /// The registry, in evaluation order.
    static ref REGISTRY: Vec<RedFlagCategory> = vec![
        RedFlagCategory {
            flag: RedFlag::Fee,
            matchers: vec![
                Regex::new(r"\b(pay|fee|paid|charge|payment|registration fee|processing fee|₹)\b").unwrap(),
            ],
        },
        RedFlagCategory {
            flag: RedFlag::Whatsapp,
            matchers: vec![
                Regex::new(r"\b(whatsapp|telegram|snapchat)\b").unwrap(),
            ],
        },
        RedFlagCategory {
            flag: RedFlag::PersonalContact,
            matchers: vec![
                Regex::new(r"\b(gmail\.com|yahoo\.com|hotmail\.com|outlook\.com)\b").unwrap(),
            ],
        },
        RedFlagCategory {
            flag: RedFlag::Vague,
            matchers: vec![
                Regex::new(r"\b(urgent hiring|no experience required|any graduate|no qualification|max 2 days)\b").unwrap(),
            ],
        },
        RedFlagCategory {
            flag: RedFlag::HighPay,
            matchers: vec![
                Regex::new(r"\b(\d{3,} per month|\d+k|\bunrealistic pay\b|\binternship stipend:?\b)\b").unwrap(),
            ],
        },
    ];
}

/// The full registry in evaluation order.
pub fn registry() -> &'static [RedFlagCategory] {
    &REGISTRY
}

/// Look up a single category.
pub fn category(flag: RedFlag) -> &'static RedFlagCategory {
    // Registry is declared in `RedFlag::ALL` order.
    &REGISTRY[flag as usize]
}

/// Check one category against raw (not yet lower-cased) text.
pub fn contains_flag(flag: RedFlag, content: &str) -> bool {
    category(flag).matches(&content.to_lowercase())
}
