//! Mission objective log exposed to the HUD layer.
//!
//! Objectives are keyed by string id and mutated exclusively through fire
//! events from scripted entities. Persisted state is plain values (string
//! ids, never entity references), so the record round-trips through a raw
//! serde copy.

use ecs_core::TICK_HZ;
use serde::{Deserialize, Serialize};

pub const MAX_OBJECTIVES: usize = 16;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ObjectiveState {
    Inactive,
    Active,
    Completed,
    Failed,
}

/// Event kind carried by a mission note entity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MissionEvent {
    Update,
    Start,
    Complete,
    Clear,
    Fail,
}

/// Mission fields attached to a scripted entity; consumed on fire.
#[derive(Debug, Clone, Default)]
pub struct MissionNote {
    pub id: Option<String>,
    pub title: Option<String>,
    pub text: Option<String>,
    pub event: Option<MissionEvent>,
    pub primary: bool,
    pub persistent: bool,
    /// Countdown limit in whole seconds; zero disables the timer.
    pub timer_limit_s: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MissionObjective {
    pub id: String,
    pub title: String,
    pub text: String,
    pub state: ObjectiveState,
    pub primary: bool,
    pub persistent: bool,
    pub timer_limit_s: u32,
    /// Remaining countdown in ticks while Active.
    pub timer_remaining: u32,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MissionLog {
    objectives: Vec<MissionObjective>,
    unread: u32,
    pub help_title: String,
    pub help_text: String,
}

fn secs_to_ticks(secs: u32) -> u32 {
    secs.saturating_mul(TICK_HZ)
}

fn ticks_to_secs(ticks: u32) -> u32 {
    ticks / TICK_HZ
}

impl MissionLog {
    pub fn new() -> Self {
        let mut log = Self::default();
        log.rebuild_help();
        log
    }

    pub fn objective_count(&self) -> usize {
        self.objectives.len()
    }

    pub fn objective(&self, index: usize) -> Option<&MissionObjective> {
        self.objectives.get(index)
    }

    pub fn find(&self, id: &str) -> Option<&MissionObjective> {
        self.objectives.iter().find(|o| o.id == id)
    }

    pub fn has_unread(&self) -> bool {
        self.unread > 0
    }

    pub fn clear_unread(&mut self) {
        self.unread = 0;
    }

    fn mark_unread(&mut self) {
        self.unread += 1;
    }

    fn find_mut(&mut self, id: &str) -> Option<&mut MissionObjective> {
        self.objectives.iter_mut().find(|o| o.id == id)
    }

    fn allocate(&mut self, id: &str) {
        let fresh = MissionObjective {
            id: id.to_string(),
            title: String::new(),
            text: String::new(),
            state: ObjectiveState::Inactive,
            primary: false,
            persistent: false,
            timer_limit_s: 0,
            timer_remaining: 0,
        };
        if self.objectives.len() >= MAX_OBJECTIVES {
            log::warn!("mission objective limit reached; reusing the last slot");
            if let Some(last) = self.objectives.last_mut() {
                *last = fresh;
            }
        } else {
            self.objectives.push(fresh);
        }
    }

    fn remove_by_id(&mut self, id: &str) {
        self.objectives.retain(|o| o.id != id);
    }

    /// Mutation entry point for scripted fire events. Returns whether the
    /// event changed the log.
    pub fn fire(
        &mut self,
        note: &MissionNote,
        entity_name: Option<&str>,
        entity_target: Option<&str>,
        entity_index: u32,
    ) -> bool {
        let event = note.event.unwrap_or(MissionEvent::Update);
        // a bare update with nothing to show is a no-op
        if event == MissionEvent::Update
            && note.id.is_none()
            && note.title.is_none()
            && note.text.is_none()
        {
            return false;
        }

        // id resolution: explicit id, then the entity's own name, then its
        // target field, then a generated fallback
        let id = note
            .id
            .clone()
            .filter(|s| !s.is_empty())
            .or_else(|| entity_name.map(str::to_string).filter(|s| !s.is_empty()))
            .or_else(|| entity_target.map(str::to_string).filter(|s| !s.is_empty()))
            .unwrap_or_else(|| format!("mission_{entity_index}"));

        if event == MissionEvent::Clear {
            self.remove_by_id(&id);
            self.rebuild_help();
            self.mark_unread();
            return true;
        }

        if self.find(&id).is_none() {
            self.allocate(&id);
        }
        let Some(obj) = self.find_mut(&id) else {
            return false;
        };

        // title falls back to the first line of the body text
        let (title, text) = match (&note.title, &note.text) {
            (Some(t), Some(x)) => (t.clone(), x.clone()),
            (Some(t), None) => (t.clone(), String::new()),
            (None, Some(x)) => match x.split_once('\n') {
                Some((head, rest)) => (head.to_string(), rest.to_string()),
                None => (x.clone(), String::new()),
            },
            (None, None) => ("Objective".to_string(), String::new()),
        };
        if !title.is_empty() {
            obj.title = title;
        }
        obj.text = text;
        obj.primary = note.primary;
        obj.persistent = note.persistent;
        obj.timer_limit_s = note.timer_limit_s;

        match event {
            MissionEvent::Start => {
                obj.state = ObjectiveState::Active;
                if obj.timer_limit_s > 0 && obj.timer_remaining == 0 {
                    obj.timer_remaining = secs_to_ticks(obj.timer_limit_s);
                }
            }
            MissionEvent::Complete => {
                obj.state = ObjectiveState::Completed;
                obj.timer_remaining = 0;
            }
            MissionEvent::Fail => {
                obj.state = ObjectiveState::Failed;
                obj.timer_remaining = 0;
            }
            MissionEvent::Update => {
                if obj.state == ObjectiveState::Inactive {
                    obj.state = ObjectiveState::Active;
                }
            }
            MissionEvent::Clear => unreachable!("handled above"),
        }

        self.rebuild_help();
        self.mark_unread();
        true
    }

    /// Per-tick countdown: Active objectives with an armed timer fail when it
    /// hits zero. The help line is rebuilt while a timer runs so its countdown
    /// suffix stays current.
    pub fn frame_update(&mut self) {
        let mut ticked = false;
        let mut failed = false;
        for obj in &mut self.objectives {
            if obj.state != ObjectiveState::Active {
                continue;
            }
            if obj.timer_remaining > 0 {
                obj.timer_remaining -= 1;
                ticked = true;
                if obj.timer_remaining == 0 && obj.timer_limit_s > 0 {
                    obj.state = ObjectiveState::Failed;
                    failed = true;
                }
            }
        }
        if ticked {
            self.rebuild_help();
        }
        if failed {
            self.mark_unread();
        }
    }

    /// Level transition: drop non-persistent objectives and re-arm the
    /// countdowns of the survivors.
    pub fn begin_level(&mut self) {
        self.objectives.retain(|o| o.persistent);
        for obj in &mut self.objectives {
            obj.timer_remaining = if obj.timer_limit_s > 0 {
                secs_to_ticks(obj.timer_limit_s)
            } else {
                0
            };
        }
        self.unread = 0;
        self.rebuild_help();
    }

    /// Rebuild the two HUD help lines from the most relevant objective:
    /// primary Active first, then any Active, then the first entry.
    pub fn rebuild_help(&mut self) {
        if self.objectives.is_empty() {
            self.help_title = "No active objectives".to_string();
            self.help_text.clear();
            return;
        }
        let primary = self
            .objectives
            .iter()
            .find(|o| o.state == ObjectiveState::Active && o.primary)
            .or_else(|| {
                self.objectives
                    .iter()
                    .find(|o| o.state == ObjectiveState::Active)
            })
            .unwrap_or(&self.objectives[0]);
        let mut title = primary.title.clone();
        if primary.state == ObjectiveState::Active && primary.timer_remaining > 0 {
            let secs = ticks_to_secs(primary.timer_remaining);
            if secs > 0 {
                title.push_str(&format!(" ({secs}s)"));
            }
        }
        self.help_title = title;
        self.help_text = primary.text.clone();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn start_note(id: &str) -> MissionNote {
        MissionNote {
            id: Some(id.to_string()),
            title: Some("Reach the relay".to_string()),
            text: Some("Get to the uplink before it locks".to_string()),
            event: Some(MissionEvent::Start),
            primary: true,
            persistent: false,
            timer_limit_s: 0,
        }
    }

    #[test]
    fn bare_update_without_content_is_ignored() {
        let mut log = MissionLog::new();
        let note = MissionNote::default();
        assert!(!log.fire(&note, None, None, 7));
        assert_eq!(log.objective_count(), 0);
    }

    #[test]
    fn id_resolution_falls_back_in_order() {
        let mut log = MissionLog::new();
        let mut note = start_note("explicit");
        assert!(log.fire(&note, Some("named"), Some("targeted"), 3));
        assert!(log.find("explicit").is_some());

        note.id = None;
        assert!(log.fire(&note, Some("named"), Some("targeted"), 3));
        assert!(log.find("named").is_some());

        assert!(log.fire(&note, None, Some("targeted"), 3));
        assert!(log.find("targeted").is_some());

        assert!(log.fire(&note, None, None, 3));
        assert!(log.find("mission_3").is_some());
    }

    #[test]
    fn title_splits_from_message_body() {
        let mut log = MissionLog::new();
        let note = MissionNote {
            id: Some("m".to_string()),
            title: None,
            text: Some("Find the exit\nThe service tunnel is unlocked".to_string()),
            event: Some(MissionEvent::Start),
            ..Default::default()
        };
        assert!(log.fire(&note, None, None, 0));
        let obj = log.find("m").expect("objective");
        assert_eq!(obj.title, "Find the exit");
        assert_eq!(obj.text, "The service tunnel is unlocked");
    }

    #[test]
    fn serde_roundtrip_preserves_state() {
        let mut log = MissionLog::new();
        assert!(log.fire(&start_note("persist"), None, None, 0));
        let json = serde_json::to_string(&log).expect("serialize");
        let back: MissionLog = serde_json::from_str(&json).expect("deserialize");
        assert_eq!(back.objective_count(), 1);
        assert_eq!(
            back.find("persist").map(|o| o.state),
            Some(ObjectiveState::Active)
        );
    }
}
