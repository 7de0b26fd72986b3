//! The comment tree builder: reconstructs a renderable forest from the flat
//! comment list of a project.
//!
//! The stored tree is unbounded (comments point at arbitrary parents) while
//! the UI renders exactly two levels, so every descendant of a root is
//! flattened into that root's reply list. A comment whose declared parent is
//! absent from the set is promoted to root level, never dropped. Pure
//! functions throughout; mutations happen elsewhere and the forest is
//! re-derived after every re-fetch.

use std::collections::{HashMap, HashSet};

use serde::Serialize;

use crate::domain::comment::Comment;
use crate::domain::like::LikeMeta;
use crate::domain::types::CommentId;

/// Number of root comments shown initially and added per "show more".
pub const VISIBLE_ROOTS_STEP: usize = 10;

/// Root ordering selected by the viewer. Replies are always chronological
/// regardless of this mode.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum CommentSort {
    #[default]
    Newest,
    Oldest,
    Popular,
}

impl CommentSort {
    /// Parse a query-string value, defaulting to `Newest`.
    pub fn parse(value: &str) -> Self {
        match value.trim().to_lowercase().as_str() {
            "oldest" => CommentSort::Oldest,
            "popular" => CommentSort::Popular,
            _ => CommentSort::Newest,
        }
    }

    pub const fn as_str(self) -> &'static str {
        match self {
            CommentSort::Newest => "newest",
            CommentSort::Oldest => "oldest",
            CommentSort::Popular => "popular",
        }
    }
}

/// A comment together with its derived like state.
#[derive(Debug, Clone, Serialize)]
pub struct CommentWithMeta {
    pub comment: Comment,
    pub likes: LikeMeta,
}

/// A root comment and its flattened, chronologically ordered replies.
#[derive(Debug, Clone, Serialize)]
pub struct CommentThread {
    pub root: CommentWithMeta,
    pub replies: Vec<CommentWithMeta>,
}

/// Build the ordered forest for rendering. Every input comment appears
/// exactly once in the output, either as a root or inside exactly one reply
/// list. Missing like metadata reads as zero likes.
pub fn build_threads(
    comments: Vec<Comment>,
    like_meta: &HashMap<CommentId, LikeMeta>,
    sort: CommentSort,
) -> Vec<CommentThread> {
    let ids: HashSet<CommentId> = comments.iter().map(|c| c.id).collect();
    let mut children: HashMap<CommentId, Vec<CommentId>> = HashMap::new();
    let mut root_ids: Vec<CommentId> = Vec::new();

    for comment in &comments {
        match comment.parent_id {
            Some(parent) if ids.contains(&parent) => {
                children.entry(parent).or_default().push(comment.id);
            }
            // No parent, or the parent is gone: promoted to root.
            _ => root_ids.push(comment.id),
        }
    }

    let mut by_id: HashMap<CommentId, Comment> =
        comments.into_iter().map(|c| (c.id, c)).collect();
    let mut placed: HashSet<CommentId> = HashSet::new();
    let mut threads: Vec<CommentThread> = Vec::new();

    let build = |root_id: CommentId,
                     by_id: &mut HashMap<CommentId, Comment>,
                     placed: &mut HashSet<CommentId>|
     -> Option<CommentThread> {
        if !placed.insert(root_id) {
            return None;
        }
        let descendants = collect_descendants(root_id, &children, placed);
        let root = with_meta(by_id.remove(&root_id)?, like_meta);
        let mut replies: Vec<CommentWithMeta> = descendants
            .into_iter()
            .filter_map(|id| by_id.remove(&id))
            .map(|c| with_meta(c, like_meta))
            .collect();
        replies.sort_by(|a, b| a.comment.created_at.cmp(&b.comment.created_at));
        Some(CommentThread { root, replies })
    };

    for root_id in root_ids {
        if let Some(thread) = build(root_id, &mut by_id, &mut placed) {
            threads.push(thread);
        }
    }

    // Records trapped in a parent cycle are reachable from no root.
    // Promote them so nothing is lost.
    let mut leftover: Vec<CommentId> = by_id.keys().copied().collect();
    leftover.sort();
    for id in leftover {
        if let Some(thread) = build(id, &mut by_id, &mut placed) {
            threads.push(thread);
        }
    }

    sort_roots(&mut threads, sort);
    threads
}

/// Depth-first collection of all descendants of `root`, marking them placed.
fn collect_descendants(
    root: CommentId,
    children: &HashMap<CommentId, Vec<CommentId>>,
    placed: &mut HashSet<CommentId>,
) -> Vec<CommentId> {
    let mut collected = Vec::new();
    let mut stack: Vec<CommentId> = children.get(&root).cloned().unwrap_or_default();
    while let Some(id) = stack.pop() {
        if !placed.insert(id) {
            continue;
        }
        collected.push(id);
        if let Some(grandchildren) = children.get(&id) {
            stack.extend(grandchildren.iter().copied());
        }
    }
    collected
}

fn with_meta(comment: Comment, like_meta: &HashMap<CommentId, LikeMeta>) -> CommentWithMeta {
    let likes = like_meta.get(&comment.id).copied().unwrap_or_default();
    CommentWithMeta { comment, likes }
}

fn sort_roots(threads: &mut [CommentThread], sort: CommentSort) {
    match sort {
        CommentSort::Newest => threads.sort_by(|a, b| {
            b.root.comment.created_at.cmp(&a.root.comment.created_at)
        }),
        CommentSort::Oldest => threads.sort_by(|a, b| {
            a.root.comment.created_at.cmp(&b.root.comment.created_at)
        }),
        CommentSort::Popular => threads.sort_by(|a, b| {
            b.likes()
                .cmp(&a.likes())
                .then(b.root.comment.created_at.cmp(&a.root.comment.created_at))
        }),
    }
}

impl CommentThread {
    fn likes(&self) -> usize {
        self.root.likes.count
    }
}

/// The monotonically growing visible-root window: the first `visible` roots
/// plus a flag telling whether more remain. Replies of a visible root are
/// always shown in full.
pub fn visible_window(threads: &[CommentThread], visible: usize) -> (&[CommentThread], bool) {
    let shown = visible.max(VISIBLE_ROOTS_STEP).min(threads.len());
    (&threads[..shown], shown < threads.len())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::types::{CommentBody, ProjectId, UserId};
    use chrono::{DateTime, NaiveDateTime};

    fn ts(secs: i64) -> NaiveDateTime {
        DateTime::from_timestamp(secs, 0).unwrap().naive_utc()
    }

    fn comment(id: i32, parent: Option<i32>, created: i64) -> Comment {
        Comment {
            id: CommentId::new(id).unwrap(),
            project_id: ProjectId::new(1).unwrap(),
            parent_id: parent.map(|p| CommentId::new(p).unwrap()),
            author_id: UserId::new("student").unwrap(),
            body: CommentBody::new(format!("comment {id}")).unwrap(),
            created_at: ts(created),
            updated_at: ts(created),
        }
    }

    fn likes(entries: &[(i32, usize)]) -> HashMap<CommentId, LikeMeta> {
        entries
            .iter()
            .map(|&(id, count)| {
                (
                    CommentId::new(id).unwrap(),
                    LikeMeta {
                        count,
                        liked_by_viewer: false,
                    },
                )
            })
            .collect()
    }

    fn root_ids(threads: &[CommentThread]) -> Vec<i32> {
        threads.iter().map(|t| t.root.comment.id.get()).collect()
    }

    #[test]
    fn empty_input_yields_empty_forest() {
        let threads = build_threads(vec![], &HashMap::new(), CommentSort::Newest);
        assert!(threads.is_empty());
    }

    #[test]
    fn oldest_sort_matches_reference_example() {
        // [{id:1,parent:null,t:10},{id:2,parent:1,t:20},{id:3,parent:null,t:5}]
        let comments = vec![
            comment(1, None, 10),
            comment(2, Some(1), 20),
            comment(3, None, 5),
        ];
        let threads = build_threads(comments, &HashMap::new(), CommentSort::Oldest);
        assert_eq!(root_ids(&threads), vec![3, 1]);
        assert!(threads[0].replies.is_empty());
        assert_eq!(threads[1].replies.len(), 1);
        assert_eq!(threads[1].replies[0].comment.id, 2);
    }

    #[test]
    fn every_record_appears_exactly_once() {
        let comments = vec![
            comment(1, None, 10),
            comment(2, Some(1), 20),
            comment(3, Some(2), 30),
            comment(4, None, 40),
            comment(5, Some(99), 50),
            comment(6, Some(4), 60),
        ];
        let threads = build_threads(comments, &HashMap::new(), CommentSort::Newest);
        let mut seen: Vec<i32> = threads
            .iter()
            .flat_map(|t| {
                std::iter::once(t.root.comment.id.get())
                    .chain(t.replies.iter().map(|r| r.comment.id.get()))
            })
            .collect();
        seen.sort_unstable();
        assert_eq!(seen, vec![1, 2, 3, 4, 5, 6]);
    }

    #[test]
    fn deep_replies_flatten_under_their_root() {
        let comments = vec![
            comment(1, None, 10),
            comment(2, Some(1), 20),
            comment(3, Some(2), 30),
            comment(4, Some(3), 40),
        ];
        let threads = build_threads(comments, &HashMap::new(), CommentSort::Newest);
        assert_eq!(threads.len(), 1);
        let reply_ids: Vec<i32> = threads[0]
            .replies
            .iter()
            .map(|r| r.comment.id.get())
            .collect();
        assert_eq!(reply_ids, vec![2, 3, 4]);
    }

    #[test]
    fn orphaned_reply_is_promoted_to_root() {
        let comments = vec![comment(1, None, 10), comment(2, Some(99), 20)];
        let threads = build_threads(comments, &HashMap::new(), CommentSort::Oldest);
        assert_eq!(root_ids(&threads), vec![1, 2]);
    }

    #[test]
    fn orphan_keeps_its_own_replies() {
        // 2's parent is missing; 3 replies to 2 and must nest under it.
        let comments = vec![comment(2, Some(99), 20), comment(3, Some(2), 30)];
        let threads = build_threads(comments, &HashMap::new(), CommentSort::Newest);
        assert_eq!(root_ids(&threads), vec![2]);
        assert_eq!(threads[0].replies.len(), 1);
        assert_eq!(threads[0].replies[0].comment.id, 3);
    }

    #[test]
    fn replies_are_chronological_regardless_of_root_sort() {
        let comments = vec![
            comment(1, None, 10),
            comment(2, Some(1), 50),
            comment(3, Some(1), 20),
            comment(4, Some(1), 35),
        ];
        for sort in [CommentSort::Newest, CommentSort::Oldest, CommentSort::Popular] {
            let threads = build_threads(comments.clone(), &HashMap::new(), sort);
            let reply_ids: Vec<i32> = threads[0]
                .replies
                .iter()
                .map(|r| r.comment.id.get())
                .collect();
            assert_eq!(reply_ids, vec![3, 4, 2]);
        }
    }

    #[test]
    fn newest_and_oldest_order_roots_by_timestamp() {
        let comments = vec![comment(1, None, 10), comment(2, None, 30), comment(3, None, 20)];
        let newest = build_threads(comments.clone(), &HashMap::new(), CommentSort::Newest);
        assert_eq!(root_ids(&newest), vec![2, 3, 1]);
        let oldest = build_threads(comments, &HashMap::new(), CommentSort::Oldest);
        assert_eq!(root_ids(&oldest), vec![1, 3, 2]);
    }

    #[test]
    fn popular_orders_by_likes_then_newest() {
        let comments = vec![
            comment(1, None, 10),
            comment(2, None, 20),
            comment(3, None, 30),
            comment(4, None, 40),
        ];
        let meta = likes(&[(1, 2), (2, 5), (3, 2), (4, 0)]);
        let threads = build_threads(comments, &meta, CommentSort::Popular);
        assert_eq!(root_ids(&threads), vec![2, 3, 1, 4]);

        let counts: Vec<usize> = threads.iter().map(|t| t.root.likes.count).collect();
        assert!(counts.windows(2).all(|w| w[0] >= w[1]));
    }

    #[test]
    fn reply_likes_do_not_affect_root_order() {
        let comments = vec![
            comment(1, None, 10),
            comment(2, Some(1), 15),
            comment(3, None, 20),
        ];
        let meta = likes(&[(2, 10), (3, 1)]);
        let threads = build_threads(comments, &meta, CommentSort::Popular);
        assert_eq!(root_ids(&threads), vec![3, 1]);
    }

    #[test]
    fn parent_cycle_is_not_dropped() {
        // Corrupt data: 1 and 2 point at each other. Both must still appear.
        let comments = vec![comment(1, Some(2), 10), comment(2, Some(1), 20)];
        let threads = build_threads(comments, &HashMap::new(), CommentSort::Oldest);
        let mut seen: Vec<i32> = threads
            .iter()
            .flat_map(|t| {
                std::iter::once(t.root.comment.id.get())
                    .chain(t.replies.iter().map(|r| r.comment.id.get()))
            })
            .collect();
        seen.sort_unstable();
        assert_eq!(seen, vec![1, 2]);
    }

    #[test]
    fn visible_window_grows_in_steps() {
        let comments: Vec<Comment> = (1..=25).map(|i| comment(i, None, i as i64)).collect();
        let threads = build_threads(comments, &HashMap::new(), CommentSort::Oldest);

        let (shown, has_more) = visible_window(&threads, VISIBLE_ROOTS_STEP);
        assert_eq!(shown.len(), 10);
        assert!(has_more);

        let (shown, has_more) = visible_window(&threads, 20);
        assert_eq!(shown.len(), 20);
        assert!(has_more);

        let (shown, has_more) = visible_window(&threads, 30);
        assert_eq!(shown.len(), 25);
        assert!(!has_more);
    }

    #[test]
    fn replies_of_visible_roots_are_complete() {
        let mut comments: Vec<Comment> = (1..=12).map(|i| comment(i, None, i as i64)).collect();
        comments.push(comment(100, Some(12), 100));
        comments.push(comment(101, Some(12), 101));
        let threads = build_threads(comments, &HashMap::new(), CommentSort::Newest);
        let (shown, _) = visible_window(&threads, VISIBLE_ROOTS_STEP);
        // Root 12 is newest, therefore first, with both replies intact.
        assert_eq!(shown[0].root.comment.id, 12);
        assert_eq!(shown[0].replies.len(), 2);
    }
}
