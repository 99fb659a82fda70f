use super::ids::TabId;

/// Side effects a reducer asks the service layer to perform.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    ScheduleAutoSave { tab: TabId },
    CancelAutoSave { tab: TabId },
    CancelAllAutoSaves,
}
