//! Shared family calendar page.

use std::collections::BTreeSet;
use std::sync::Arc;

use famhub_calendar::{
    schedule, CalendarError, DateKey, DayCell, DayTone, HolidaySet, MonthGrid, ScheduleEntry,
    TimeOfDay,
};
use famhub_core::AppError;
use famhub_services::{member_name, FamilyClient, Member, NewSchedule, ScheduleUpdate};

use super::edit_state::EditStates;
use super::outcome::{checked, or_empty, surfaced};
use super::scope::ViewScope;

/// Add-entry form under the selected day.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ScheduleForm {
    pub author_id: String,
    pub title: String,
    pub time: TimeOfDay,
}

/// Inline edit of an existing entry. Date and author are fixed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScheduleDraft {
    pub title: String,
    pub time: TimeOfDay,
}

/// A day cell with the page-level highlights applied.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CalendarCell<'a> {
    pub day: &'a DayCell,
    pub tone: DayTone,
    pub has_entries: bool,
    pub is_today: bool,
    pub is_selected: bool,
}

pub struct ScheduleModel {
    client: FamilyClient,
    scope: ViewScope,
    holidays: Arc<HolidaySet>,
    step_minutes: u32,
    today: DateKey,
    grid: MonthGrid,
    selected: DateKey,
    members: Vec<Member>,
    entries: Vec<ScheduleEntry>,
    marked: BTreeSet<DateKey>,
    form: ScheduleForm,
    edits: EditStates<String, ScheduleDraft>,
}

impl ScheduleModel {
    /// Page opened on the current month with today selected.
    pub fn new(
        client: FamilyClient,
        scope: ViewScope,
        holidays: Arc<HolidaySet>,
        step_minutes: u32,
    ) -> Result<Self, CalendarError> {
        Self::opened_on(client, scope, holidays, step_minutes, DateKey::today())
    }

    pub fn opened_on(
        client: FamilyClient,
        scope: ViewScope,
        holidays: Arc<HolidaySet>,
        step_minutes: u32,
        today: DateKey,
    ) -> Result<Self, CalendarError> {
        let grid = MonthGrid::containing(today, &holidays)?;
        if !holidays.covers_year(grid.year()) {
            tracing::warn!("No holidays listed for {}; only weekends will be marked", grid.year());
        }
        Ok(Self {
            client,
            scope,
            holidays,
            step_minutes,
            today,
            grid,
            selected: today,
            members: Vec::new(),
            entries: Vec::new(),
            marked: BTreeSet::new(),
            form: ScheduleForm::default(),
            edits: EditStates::new(),
        })
    }

    pub async fn load(&mut self) {
        let client = &self.client;
        let fetched = self
            .scope
            .run(async { tokio::join!(client.list_members(), self.fetch_month()) })
            .await;
        let Some((members, entries)) = fetched else {
            return;
        };
        self.members = or_empty("members", members);
        self.set_entries(entries);
    }

    async fn fetch_month(&self) -> famhub_services::RepoResult<Vec<ScheduleEntry>> {
        match (self.grid.first_key(), self.grid.last_key()) {
            (Some(start), Some(end)) => self.client.list_schedules(start, end).await,
            _ => Ok(Vec::new()),
        }
    }

    /// Refetch only the visible month's entries.
    pub async fn refresh(&mut self) {
        if let Some(entries) = self.scope.run(self.fetch_month()).await {
            self.set_entries(entries);
        }
    }

    fn set_entries(&mut self, result: famhub_services::RepoResult<Vec<ScheduleEntry>>) {
        self.entries = schedule::sort(or_empty("schedules", result));
        self.marked = schedule::dates_with_entries(&self.entries);
        let entries = &self.entries;
        self.edits.retain(|id| entries.iter().any(|e| &e.id == id));
    }

    pub async fn prev_month(&mut self) {
        match self.grid.prev(&self.holidays) {
            Ok(grid) => self.show(grid).await,
            Err(e) => tracing::warn!("Cannot move before {}: {}", self.grid.label(), e),
        }
    }

    pub async fn next_month(&mut self) {
        match self.grid.next(&self.holidays) {
            Ok(grid) => self.show(grid).await,
            Err(e) => tracing::warn!("Cannot move past {}: {}", self.grid.label(), e),
        }
    }

    async fn show(&mut self, grid: MonthGrid) {
        if !self.holidays.covers_year(grid.year()) {
            tracing::warn!("No holidays listed for {}", grid.year());
        }
        self.grid = grid;
        self.edits.clear();
        self.refresh().await;
    }

    pub fn grid(&self) -> &MonthGrid {
        &self.grid
    }

    pub fn label(&self) -> String {
        self.grid.label()
    }

    pub fn members(&self) -> &[Member] {
        &self.members
    }

    pub fn author_name(&self, id: &str) -> &str {
        member_name(&self.members, id)
    }

    pub fn today(&self) -> DateKey {
        self.today
    }

    pub fn selected(&self) -> DateKey {
        self.selected
    }

    /// Selection survives month navigation.
    pub fn select(&mut self, day: DateKey) {
        self.selected = day;
    }

    /// Dates in the visible month with at least one entry.
    pub fn has_entries(&self, day: DateKey) -> bool {
        self.marked.contains(&day)
    }

    pub fn cells(&self) -> Vec<CalendarCell<'_>> {
        self.grid
            .days()
            .iter()
            .map(|day| CalendarCell {
                day,
                tone: day.tone(),
                has_entries: self.has_entries(day.date_key),
                is_today: day.date_key == self.today,
                is_selected: day.date_key == self.selected,
            })
            .collect()
    }

    /// Entries of the selected day in display order.
    pub fn selected_entries(&self) -> Vec<&ScheduleEntry> {
        schedule::entries_on(&self.entries, self.selected)
    }

    /// Picker values for the time field.
    pub fn time_slots(&self) -> Vec<TimeOfDay> {
        TimeOfDay::slots(self.step_minutes)
    }

    pub fn form_mut(&mut self) -> &mut ScheduleForm {
        &mut self.form
    }

    /// Add an entry on the selected day. Time left unset means all day.
    /// Title is cleared on success; author and time are kept.
    pub async fn add(&mut self) -> Result<ScheduleEntry, AppError> {
        let new = NewSchedule {
            title: self.form.title.trim().to_string(),
            schedule_date: self.selected,
            schedule_time: self.form.time,
            author_id: self.form.author_id.clone(),
        };
        checked("schedule", new.validate(self.step_minutes))?;
        let created = surfaced("add schedule", self.client.create_schedule(new).await)?;
        self.form.title.clear();
        self.refresh().await;
        Ok(created)
    }

    pub fn begin_edit(&mut self, id: &str) {
        if let Some(entry) = self.entries.iter().find(|e| e.id == id) {
            let draft = ScheduleDraft {
                title: entry.title.clone(),
                time: entry.time,
            };
            self.edits.begin(id.to_string(), draft);
        }
    }

    pub fn is_editing(&self, id: &str) -> bool {
        self.edits.is_editing(&id.to_string())
    }

    pub fn draft_mut(&mut self, id: &str) -> Option<&mut ScheduleDraft> {
        self.edits.draft_mut(&id.to_string())
    }

    pub fn cancel_edit(&mut self, id: &str) {
        self.edits.cancel(&id.to_string());
    }

    /// Save an inline edit. The row stays in edit mode when rejected.
    pub async fn save_edit(&mut self, id: &str) -> Result<(), AppError> {
        let key = id.to_string();
        let Some(draft) = self.edits.draft(&key) else {
            return Ok(());
        };
        let update = ScheduleUpdate {
            title: draft.title.trim().to_string(),
            schedule_time: draft.time,
        };
        checked("schedule update", update.validate(self.step_minutes))?;
        surfaced("update schedule", self.client.update_schedule(id, update).await)?;
        self.edits.commit(&key);
        self.refresh().await;
        Ok(())
    }

    pub async fn delete(&mut self, id: &str) -> Result<(), AppError> {
        surfaced("delete schedule", self.client.delete_schedule(id).await)?;
        self.edits.cancel(&id.to_string());
        self.refresh().await;
        Ok(())
    }
}
