//! Reads feature flags and the CTA button count out of a view state snapshot.
//!
//! Sections appear and disappear as the form changes shape, so every lookup
//! tolerates a missing block or control and treats it as "not selected".

use std::fmt;
use std::str::FromStr;

use thiserror::Error;

use super::catalog::{
    CALL_TO_ACTION_TOGGLE_ACTION, CALL_TO_ACTION_TOGGLE_BLOCK, CTA_DROPDOWN_ACTION,
    CTA_DROPDOWN_BLOCK, MAX_CTA_BUTTONS, SENDER_IDENTITY_TOGGLE_ACTION,
    SENDER_IDENTITY_TOGGLE_BLOCK,
};
use super::state::FormState;

/// Which optional sections of the form are switched on.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FeatureFlags {
    pub customize_sender_identity: bool,
    pub call_to_action: bool,
}

impl FeatureFlags {
    pub const fn new(customize_sender_identity: bool, call_to_action: bool) -> Self {
        Self {
            customize_sender_identity,
            call_to_action,
        }
    }
}

/// Number of CTA buttons requested, always within `1..=3`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct CtaCount(u8);

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CtaCountError {
    #[error("CTA count {0:?} is not a number")]
    NotNumeric(String),

    #[error("CTA count {0} is outside 1..=3")]
    OutOfRange(i64),
}

impl CtaCount {
    pub fn new(count: u8) -> Result<Self, CtaCountError> {
        if (1..=MAX_CTA_BUTTONS).contains(&count) {
            Ok(Self(count))
        } else {
            Err(CtaCountError::OutOfRange(i64::from(count)))
        }
    }

    pub const fn get(self) -> u8 {
        self.0
    }

    /// 1-based indices `1..=count`.
    pub fn indices(self) -> impl Iterator<Item = u8> {
        1..=self.0
    }
}

impl FromStr for CtaCount {
    type Err = CtaCountError;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        let parsed: i64 = raw
            .trim()
            .parse()
            .map_err(|_| CtaCountError::NotNumeric(raw.to_string()))?;
        u8::try_from(parsed)
            .map_err(|_| CtaCountError::OutOfRange(parsed))
            .and_then(Self::new)
    }
}

impl fmt::Display for CtaCount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Everything the composer needs to know about the current form.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FormSelection {
    pub flags: FeatureFlags,
    pub cta_count: Option<CtaCount>,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum InterpretError {
    /// The dropdown holds a value that is not a valid button count. The flags
    /// read from the same snapshot are kept so callers can render a fallback.
    #[error("unparseable CTA count {raw:?}: {source}")]
    UnparseableCtaCount {
        flags: FeatureFlags,
        raw: String,
        #[source]
        source: CtaCountError,
    },
}

/// `true` when the identity checkbox has a ticked option.
pub fn sender_identity_selected(state: &FormState) -> bool {
    state
        .control(SENDER_IDENTITY_TOGGLE_BLOCK, SENDER_IDENTITY_TOGGLE_ACTION)
        .is_some_and(|control| control.is_checked())
}

/// `true` when the CTA checkbox has a ticked option.
pub fn call_to_action_selected(state: &FormState) -> bool {
    state
        .control(CALL_TO_ACTION_TOGGLE_BLOCK, CALL_TO_ACTION_TOGGLE_ACTION)
        .is_some_and(|control| control.is_checked())
}

/// `true` when the CTA dropdown section was rendered in this view.
pub fn cta_dropdown_rendered(state: &FormState) -> bool {
    state.contains_block(CTA_DROPDOWN_BLOCK)
}

/// Raw dropdown selection, if the dropdown exists and has a selection.
pub fn raw_cta_count(state: &FormState) -> Option<&str> {
    state
        .control(CTA_DROPDOWN_BLOCK, CTA_DROPDOWN_ACTION)?
        .selected_value()
}

/// Derives flags and CTA count from a snapshot.
///
/// The CTA section counts as active when its checkbox is ticked or when the
/// dropdown is present at all: a rendered dropdown means the section was on
/// when the view was last built.
pub fn interpret(state: &FormState) -> Result<FormSelection, InterpretError> {
    let flags = FeatureFlags {
        customize_sender_identity: sender_identity_selected(state),
        call_to_action: call_to_action_selected(state) || cta_dropdown_rendered(state),
    };

    let cta_count = match raw_cta_count(state) {
        None => None,
        Some(raw) => Some(raw.parse::<CtaCount>().map_err(|source| {
            InterpretError::UnparseableCtaCount {
                flags,
                raw: raw.to_string(),
                source,
            }
        })?),
    };

    Ok(FormSelection { flags, cta_count })
}
