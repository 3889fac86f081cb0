//! Home dashboard: member notices, latest posts and this week's schedule.

use std::collections::HashMap;

use famhub_calendar::{schedule, DateKey, ScheduleEntry, WeekRange};
use famhub_core::AppError;
use famhub_services::{member_name, FamilyClient, Member, Notice, Post};

use super::edit_state::{EditState, EditStates};
use super::outcome::{or_empty, surfaced};
use super::scope::ViewScope;

pub struct HomeModel {
    client: FamilyClient,
    scope: ViewScope,
    recent_limit: usize,
    today: DateKey,
    week: WeekRange,
    members: Vec<Member>,
    notices: HashMap<String, String>,
    notice_edits: EditStates<String, String>,
    recent_posts: Vec<Post>,
    week_schedules: Vec<ScheduleEntry>,
}

impl HomeModel {
    pub fn new(client: FamilyClient, scope: ViewScope, recent_limit: usize) -> Self {
        let today = DateKey::today();
        Self {
            client,
            scope,
            recent_limit,
            today,
            week: WeekRange::week_of(today),
            members: Vec::new(),
            notices: HashMap::new(),
            notice_edits: EditStates::new(),
            recent_posts: Vec::new(),
            week_schedules: Vec::new(),
        }
    }

    /// Pin "today" to a fixed date. The next load uses its week.
    pub fn set_today(&mut self, today: DateKey) {
        self.today = today;
        self.week = WeekRange::week_of(today);
    }

    pub async fn load(&mut self) {
        let client = &self.client;
        let fetched = self
            .scope
            .run(async {
                tokio::join!(
                    client.list_members(),
                    client.list_notices(),
                    client.recent_posts(self.recent_limit),
                    client.list_schedules(self.week.start, self.week.end),
                )
            })
            .await;
        let Some((members, notices, posts, schedules)) = fetched else {
            return;
        };

        self.members = or_empty("members", members);
        self.notices = or_empty("notices", notices)
            .into_iter()
            .map(|n| (n.author_id, n.content))
            .collect();
        self.recent_posts = or_empty("recent posts", posts);
        self.week_schedules = schedule::sort(or_empty("week schedules", schedules));

        let members = &self.members;
        self.notice_edits
            .retain(|id| members.iter().any(|m| &m.id == id));
        tracing::debug!(
            "Home loaded: {} members, {} posts, {} schedules this week",
            self.members.len(),
            self.recent_posts.len(),
            self.week_schedules.len()
        );
    }

    pub fn members(&self) -> &[Member] {
        &self.members
    }

    pub fn author_name(&self, id: &str) -> &str {
        member_name(&self.members, id)
    }

    /// Saved notice for a member, empty when none.
    pub fn notice_for(&self, member_id: &str) -> &str {
        self.notices.get(member_id).map(String::as_str).unwrap_or("")
    }

    pub fn notice_state(&self, member_id: &str) -> EditState<&String> {
        self.notice_edits.state(&member_id.to_string())
    }

    /// Open the notice editor seeded with the saved text.
    pub fn begin_notice_edit(&mut self, member_id: &str) {
        let current = self.notice_for(member_id).to_string();
        self.notice_edits.begin(member_id.to_string(), current);
    }

    pub fn notice_draft_mut(&mut self, member_id: &str) -> Option<&mut String> {
        self.notice_edits.draft_mut(&member_id.to_string())
    }

    pub fn cancel_notice_edit(&mut self, member_id: &str) {
        self.notice_edits.cancel(&member_id.to_string());
    }

    /// Upsert the open draft. Does nothing if the notice is not being edited.
    /// On failure the editor stays open with the draft intact.
    pub async fn save_notice(&mut self, member_id: &str) -> Result<(), AppError> {
        let key = member_id.to_string();
        let Some(content) = self.notice_edits.draft(&key).cloned() else {
            return Ok(());
        };
        let notice = Notice {
            author_id: key.clone(),
            content,
        };
        let saved = surfaced("save notice", self.client.upsert_notice(notice).await)?;
        self.notice_edits.commit(&key);
        self.notices.insert(saved.author_id, saved.content);
        Ok(())
    }

    pub fn recent_posts(&self) -> &[Post] {
        &self.recent_posts
    }

    pub fn week(&self) -> WeekRange {
        self.week
    }

    /// This week's entries in display order.
    pub fn week_schedules(&self) -> &[ScheduleEntry] {
        &self.week_schedules
    }

    pub fn is_today(&self, entry: &ScheduleEntry) -> bool {
        entry.date == self.today
    }
}
