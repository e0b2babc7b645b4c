//! Process-wide notification store.
//!
//! Holds the notification list (newest first) and an unread counter. The
//! counter is maintained incrementally rather than derived from the list:
//! removing an entry leaves it untouched, so it can drift above the number
//! of unread entries until the next `mark_all_as_read` or `clear_all`.
//! Consumers that need the true figure can count `read == false` entries.

use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};
use rand::Rng;
use serde::{Deserialize, Serialize};
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::{debug, info};

const ID_ALPHABET: &[u8] = b"0123456789abcdefghijklmnopqrstuvwxyz";
const ID_LEN: usize = 9;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NotificationKind {
    Match,
    Prediction,
    Alert,
    Promo,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MatchInfo {
    pub home_team: String,
    pub away_team: String,
    pub time: String,
}

/// Caller-supplied fields. The store assigns id, timestamp and read flag.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewNotification {
    #[serde(rename = "type")]
    pub kind: NotificationKind,
    pub title: String,
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub action_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sport: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub league: Option<String>,
    #[serde(default, rename = "match", skip_serializing_if = "Option::is_none")]
    pub match_info: Option<MatchInfo>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Notification {
    pub id: String,
    #[serde(rename = "type")]
    pub kind: NotificationKind,
    pub title: String,
    pub message: String,
    pub timestamp: DateTime<Utc>,
    pub read: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub action_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sport: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub league: Option<String>,
    #[serde(rename = "match", skip_serializing_if = "Option::is_none")]
    pub match_info: Option<MatchInfo>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NotificationSnapshot {
    pub notifications: Vec<Notification>,
    pub unread_count: usize,
}

/// Single authority for notifications. Mutations are published to every
/// `subscribe()`r; a no-op mutation publishes nothing.
pub struct NotificationStore {
    tx: watch::Sender<NotificationSnapshot>,
}

impl NotificationStore {
    pub fn new() -> Self {
        let (tx, _rx) = watch::channel(NotificationSnapshot::default());
        Self { tx }
    }

    /// Prepend a new unread notification. Returns its id.
    pub fn add_notification(&self, new: NewNotification) -> String {
        let id = generate_id();
        let notification = Notification {
            id: id.clone(),
            kind: new.kind,
            title: new.title,
            message: new.message,
            timestamp: Utc::now(),
            read: false,
            action_url: new.action_url,
            sport: new.sport,
            league: new.league,
            match_info: new.match_info,
        };
        self.tx.send_modify(|s| {
            s.notifications.insert(0, notification);
            s.unread_count += 1;
        });
        debug!(id = %id, "Notification added");
        id
    }

    /// Mark one entry read. Unknown or already-read ids change nothing.
    pub fn mark_as_read(&self, id: &str) -> bool {
        self.tx.send_if_modified(|s| {
            match s.notifications.iter_mut().find(|n| n.id == id && !n.read) {
                Some(n) => {
                    n.read = true;
                    s.unread_count = s.unread_count.saturating_sub(1);
                    true
                }
                None => false,
            }
        })
    }

    pub fn mark_all_as_read(&self) {
        self.tx.send_if_modified(|s| {
            let changed = s.unread_count != 0 || s.notifications.iter().any(|n| !n.read);
            for n in &mut s.notifications {
                n.read = true;
            }
            s.unread_count = 0;
            changed
        });
    }

    /// Drop one entry. The unread counter is not adjusted.
    pub fn remove_notification(&self, id: &str) -> bool {
        self.tx.send_if_modified(|s| {
            let before = s.notifications.len();
            s.notifications.retain(|n| n.id != id);
            s.notifications.len() != before
        })
    }

    pub fn clear_all(&self) {
        self.tx.send_if_modified(|s| {
            let changed = !s.notifications.is_empty() || s.unread_count != 0;
            s.notifications.clear();
            s.unread_count = 0;
            changed
        });
    }

    pub fn snapshot(&self) -> NotificationSnapshot {
        self.tx.borrow().clone()
    }

    pub fn unread_count(&self) -> usize {
        self.tx.borrow().unread_count
    }

    pub fn subscribe(&self) -> watch::Receiver<NotificationSnapshot> {
        self.tx.subscribe()
    }
}

impl Default for NotificationStore {
    fn default() -> Self {
        Self::new()
    }
}

fn generate_id() -> String {
    let mut rng = rand::thread_rng();
    (0..ID_LEN)
        .map(|_| ID_ALPHABET[rng.gen_range(0..ID_ALPHABET.len())] as char)
        .collect()
}

// ---------------------------------------------------------------------------
// Templates
// ---------------------------------------------------------------------------

pub fn match_notification(
    sport: &str,
    league: &str,
    home_team: &str,
    away_team: &str,
    time: &str,
) -> NewNotification {
    NewNotification {
        kind: NotificationKind::Match,
        title: format!("{sport} Match Starting Soon"),
        message: format!("{home_team} vs {away_team} in {league}"),
        action_url: Some("/predictions".to_string()),
        sport: Some(sport.to_string()),
        league: Some(league.to_string()),
        match_info: Some(MatchInfo {
            home_team: home_team.to_string(),
            away_team: away_team.to_string(),
            time: time.to_string(),
        }),
    }
}

pub fn prediction_notification(sport: &str, prediction: &str) -> NewNotification {
    NewNotification {
        kind: NotificationKind::Prediction,
        title: format!("New {sport} Prediction Available"),
        message: prediction.to_string(),
        action_url: Some("/predictions".to_string()),
        sport: Some(sport.to_string()),
        league: None,
        match_info: None,
    }
}

pub fn alert_notification(title: &str, message: &str) -> NewNotification {
    NewNotification {
        kind: NotificationKind::Alert,
        title: title.to_string(),
        message: message.to_string(),
        action_url: None,
        sport: None,
        league: None,
        match_info: None,
    }
}

/// Demo feed: three upcoming-match notifications, `stagger` apart.
pub fn simulate_upcoming_matches(store: Arc<NotificationStore>, stagger: Duration) -> JoinHandle<()> {
    let upcoming = [
        ("Football", "Premier League", "Manchester City", "Liverpool", "15:00"),
        ("Basketball", "NBA", "Lakers", "Celtics", "22:30"),
        ("Rugby", "Six Nations", "England", "France", "14:30"),
    ];
    tokio::spawn(async move {
        for (i, (sport, league, home, away, time)) in upcoming.into_iter().enumerate() {
            if i > 0 {
                tokio::time::sleep(stagger).await;
            }
            store.add_notification(match_notification(sport, league, home, away, time));
        }
        info!(count = upcoming.len(), "Demo notifications delivered");
    })
}
