//! Board list page.

use std::collections::HashMap;

use famhub_calendar::Freshness;
use famhub_services::{member_name, FamilyClient, Member, Post};

use super::outcome::or_empty;
use super::scope::ViewScope;

/// One line of the post list.
#[derive(Debug, Clone, PartialEq)]
pub struct BoardRow<'a> {
    pub post: &'a Post,
    pub author: &'a str,
    pub is_new: bool,
    pub comment_count: usize,
}

pub struct BoardModel {
    client: FamilyClient,
    scope: ViewScope,
    window_hours: i64,
    members: Vec<Member>,
    posts: Vec<Post>,
    comment_counts: HashMap<String, usize>,
}

impl BoardModel {
    pub fn new(client: FamilyClient, scope: ViewScope, window_hours: i64) -> Self {
        Self {
            client,
            scope,
            window_hours,
            members: Vec::new(),
            posts: Vec::new(),
            comment_counts: HashMap::new(),
        }
    }

    pub async fn load(&mut self) {
        let client = &self.client;
        let fetched = self
            .scope
            .run(async {
                tokio::join!(
                    client.list_members(),
                    client.list_posts(),
                    client.comment_counts()
                )
            })
            .await;
        let Some((members, posts, counts)) = fetched else {
            return;
        };
        self.members = or_empty("members", members);
        self.posts = or_empty("posts", posts);
        self.comment_counts = or_empty("comment counts", counts);
        tracing::debug!("Board loaded {} posts", self.posts.len());
    }

    pub fn posts(&self) -> &[Post] {
        &self.posts
    }

    pub fn comment_count(&self, post_id: &str) -> usize {
        self.comment_counts.get(post_id).copied().unwrap_or(0)
    }

    /// Rows newest first, every row judged against the same clock reading.
    pub fn rows_at(&self, freshness: &Freshness) -> Vec<BoardRow<'_>> {
        self.posts
            .iter()
            .map(|post| BoardRow {
                post,
                author: member_name(&self.members, &post.author_id),
                is_new: freshness.is_fresh(post.created_at),
                comment_count: self.comment_count(&post.id),
            })
            .collect()
    }

    pub fn rows(&self) -> Vec<BoardRow<'_>> {
        self.rows_at(&Freshness::snapshot(self.window_hours))
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    use super::*;
    use crate::models::fixtures::{client_with_members, unreachable_client};
    use chrono::Duration;
    use famhub_services::{NewComment, NewPost, UNKNOWN_MEMBER};

    #[tokio::test]
    async fn rows_carry_author_badge_and_counts() {
        let (client, members) = client_with_members(&["Mom"]);
        let mom = members[0].id.clone();
        let first = client
            .create_post(NewPost {
                title: "first".into(),
                content: "a".into(),
                author_id: mom.clone(),
                is_notice: false,
            })
            .await
            .unwrap();
        client
            .create_post(NewPost {
                title: "second".into(),
                content: "b".into(),
                author_id: "gone".into(),
                is_notice: true,
            })
            .await
            .unwrap();
        for text in ["one", "two"] {
            client
                .create_comment(NewComment {
                    post_id: first.id.clone(),
                    author_id: mom.clone(),
                    content: text.into(),
                })
                .await
                .unwrap();
        }

        let mut board = BoardModel::new(client, ViewScope::new(), 24);
        board.load().await;

        let now = Freshness::at(first.created_at + Duration::hours(1), 24);
        let rows = board.rows_at(&now);
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].post.title, "second");
        assert_eq!(rows[0].author, UNKNOWN_MEMBER);
        assert_eq!(rows[0].comment_count, 0);
        assert!(rows[0].post.is_notice);
        assert_eq!(rows[1].author, "Mom");
        assert_eq!(rows[1].comment_count, 2);
        assert!(rows[1].is_new);

        let later = Freshness::at(first.created_at + Duration::hours(30), 24);
        assert!(!board.rows_at(&later)[1].is_new);
    }

    #[tokio::test]
    async fn unreachable_backend_gives_empty_list() {
        let mut board = BoardModel::new(unreachable_client(), ViewScope::new(), 24);
        board.load().await;
        assert!(board.rows().is_empty());
        assert_eq!(board.comment_count("x"), 0);
    }
}
