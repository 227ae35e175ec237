//! Action codes and the dispatch table.
//!
//! Each surface detection action maps to an [`ActionPlan`]: which parameter
//! groups it touches, which procedure it runs, and whether the surface
//! payload is returned. Under `use_default_parameters` only the touched
//! groups are reset; untouched groups keep their current value even when
//! the caller asked for defaults (FIND_ONLY leaves scan parameters alone).

use crate::error::{ParikshaError, Result};

/// Surface detection service actions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum Action {
    GetCurrentParameters = 1,
    GetDefaultParameters = 2,
    PublishScanPath = 3,
    ScanAndFindOnly = 4,
    ScanFindAndReturn = 5,
    FindOnly = 6,
    FindAndReturn = 7,
    ReturnLatestResults = 8,
}

/// What an action runs after parameter resolution.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Procedure {
    /// Report current scan + detection parameters
    ReportCurrent,
    /// Report default scan + detection parameters
    ReportDefault,
    /// Publish the scan path preview only
    PreviewScanPath,
    /// Scan, then find surfaces in the new data
    ScanThenFind,
    /// Find surfaces in already accumulated data
    Find,
    /// Return the cached result
    ReturnLatest,
}

/// Dispatch table row.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ActionPlan {
    pub touches_scan: bool,
    pub touches_detection: bool,
    pub procedure: Procedure,
    pub returns_surfaces: bool,
}

const fn row(
    touches_scan: bool,
    touches_detection: bool,
    procedure: Procedure,
    returns_surfaces: bool,
) -> ActionPlan {
    ActionPlan {
        touches_scan,
        touches_detection,
        procedure,
        returns_surfaces,
    }
}

impl Action {
    /// All actions in code order.
    pub const ALL: [Action; 8] = [
        Action::GetCurrentParameters,
        Action::GetDefaultParameters,
        Action::PublishScanPath,
        Action::ScanAndFindOnly,
        Action::ScanFindAndReturn,
        Action::FindOnly,
        Action::FindAndReturn,
        Action::ReturnLatestResults,
    ];

    /// Dispatch table lookup.
    pub const fn plan(self) -> ActionPlan {
        use Procedure::*;
        match self {
            Action::GetCurrentParameters => row(false, false, ReportCurrent, false),
            Action::GetDefaultParameters => row(false, false, ReportDefault, false),
            Action::PublishScanPath => row(true, false, PreviewScanPath, false),
            Action::ScanAndFindOnly => row(true, true, ScanThenFind, false),
            Action::ScanFindAndReturn => row(true, true, ScanThenFind, true),
            Action::FindOnly => row(false, true, Find, false),
            Action::FindAndReturn => row(false, true, Find, true),
            Action::ReturnLatestResults => row(false, false, ReturnLatest, true),
        }
    }

    pub const fn code(self) -> u8 {
        self as u8
    }
}

impl TryFrom<u8> for Action {
    type Error = ParikshaError;

    fn try_from(code: u8) -> Result<Self> {
        Action::ALL
            .into_iter()
            .find(|a| a.code() == code)
            .ok_or(ParikshaError::UnsupportedAction {
                service: "surface_detection",
                code,
            })
    }
}

/// Selection service actions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum SelectAction {
    Select = 1,
    Deselect = 2,
    SelectAll = 3,
    DeselectAll = 4,
    HideAll = 5,
    ShowAll = 6,
}

impl TryFrom<u8> for SelectAction {
    type Error = ParikshaError;

    fn try_from(code: u8) -> Result<Self> {
        match code {
            1 => Ok(SelectAction::Select),
            2 => Ok(SelectAction::Deselect),
            3 => Ok(SelectAction::SelectAll),
            4 => Ok(SelectAction::DeselectAll),
            5 => Ok(SelectAction::HideAll),
            6 => Ok(SelectAction::ShowAll),
            _ => Err(ParikshaError::UnsupportedAction {
                service: "select_surface",
                code,
            }),
        }
    }
}

/// Parameter query service actions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum ParameterQueryAction {
    GetCurrent = 1,
    GetDefault = 2,
}

impl TryFrom<u8> for ParameterQueryAction {
    type Error = ParikshaError;

    fn try_from(code: u8) -> Result<Self> {
        match code {
            1 => Ok(ParameterQueryAction::GetCurrent),
            2 => Ok(ParameterQueryAction::GetDefault),
            _ => Err(ParikshaError::UnsupportedAction {
                service: "surface_blending_parameters",
                code,
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_codes_round_trip() {
        for action in Action::ALL {
            assert_eq!(Action::try_from(action.code()).unwrap(), action);
        }
    }

    #[test]
    fn test_unknown_codes_rejected() {
        assert!(matches!(
            Action::try_from(0),
            Err(ParikshaError::UnsupportedAction { code: 0, .. })
        ));
        assert!(Action::try_from(9).is_err());
        assert!(SelectAction::try_from(7).is_err());
        assert!(ParameterQueryAction::try_from(3).is_err());
    }

    #[test]
    fn test_find_actions_never_touch_scan() {
        assert!(!Action::FindOnly.plan().touches_scan);
        assert!(!Action::FindAndReturn.plan().touches_scan);
        assert!(Action::FindOnly.plan().touches_detection);
    }

    #[test]
    fn test_preview_touches_only_scan() {
        let plan = Action::PublishScanPath.plan();
        assert!(plan.touches_scan);
        assert!(!plan.touches_detection);
        assert_eq!(plan.procedure, Procedure::PreviewScanPath);
    }

    #[test]
    fn test_queries_touch_nothing() {
        for action in [
            Action::GetCurrentParameters,
            Action::GetDefaultParameters,
            Action::ReturnLatestResults,
        ] {
            let plan = action.plan();
            assert!(!plan.touches_scan && !plan.touches_detection);
        }
    }

    #[test]
    fn test_only_variants_clear_payload() {
        assert!(!Action::ScanAndFindOnly.plan().returns_surfaces);
        assert!(Action::ScanFindAndReturn.plan().returns_surfaces);
        assert!(!Action::FindOnly.plan().returns_surfaces);
        assert!(Action::FindAndReturn.plan().returns_surfaces);
    }
}
