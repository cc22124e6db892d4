use keep_engine::{Easing, ViewportPos};
use serde::{Deserialize, Serialize};

/// Number of safes on the tower.
pub const PANEL_COUNT: usize = 7;

/// Gating step that follows safe 7: the closing fly-out.
pub const FINALE_STEP: u8 = 8;

/// A tooltip shown beside a UI element.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Tooltip {
    /// "Click Me!" over safe 1..=7.
    Safe(u8),
    /// Over the "Get CV" scroll button.
    Cv,
    /// Over the "Contact Now" scroll button.
    Contact,
}

impl Tooltip {
    /// Every tooltip the page carries.
    pub fn all() -> impl Iterator<Item = Tooltip> {
        (1..=PANEL_COUNT as u8)
            .map(Tooltip::Safe)
            .chain([Tooltip::Cv, Tooltip::Contact])
    }

    /// DOM-facing stem: `safe`, `safe-3`, `cv`, `contact`.
    pub fn stem(&self) -> String {
        match self {
            Tooltip::Safe(1) => "safe".to_string(),
            Tooltip::Safe(n) => format!("safe-{}", n),
            Tooltip::Cv => "cv".to_string(),
            Tooltip::Contact => "contact".to_string(),
        }
    }

    /// Numeric code carried in game events: safes 1..=7, cv 8, contact 9.
    pub fn code(&self) -> f32 {
        match self {
            Tooltip::Safe(n) => *n as f32,
            Tooltip::Cv => 8.0,
            Tooltip::Contact => 9.0,
        }
    }
}

/// What the dragon does once an override line finishes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FollowupAction {
    /// Scroll to and fly beside safe N (2..=7).
    MoveToSafe(u8),
    /// Fly to the closing pose and deliver the farewell.
    MoveToEndSequence,
}

impl FollowupAction {
    /// The tag form used on the page, e.g. `move-to-safe-3`.
    pub fn tag(&self) -> String {
        match self {
            FollowupAction::MoveToSafe(n) => format!("move-to-safe-{}", n),
            FollowupAction::MoveToEndSequence => "move-to-end-sequence".to_string(),
        }
    }

    /// Gating step unlocked by this action.
    pub fn step(&self) -> u8 {
        match self {
            FollowupAction::MoveToSafe(n) => *n,
            FollowupAction::MoveToEndSequence => FINALE_STEP,
        }
    }
}

/// One bubble of dialogue. Immutable once queued.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct DialogueLine {
    #[serde(default)]
    pub text: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub followup: Option<FollowupAction>,
    /// Tooltip shown (with auto-hide) when this line appears.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tooltip: Option<Tooltip>,
}

impl DialogueLine {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            ..Default::default()
        }
    }

    pub fn with_tooltip(mut self, tooltip: Tooltip) -> Self {
        self.tooltip = Some(tooltip);
        self
    }
}

/// A `dragon-say` request: `{ text, nextAction }` plus optional follow-on lines.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct SayRequest {
    #[serde(default)]
    pub text: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub next_action: Option<FollowupAction>,
    /// Lines queued after `text`; all are spoken before `next_action` runs.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub then: Vec<DialogueLine>,
}

impl SayRequest {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            ..Default::default()
        }
    }

    pub fn with_action(mut self, action: FollowupAction) -> Self {
        self.next_action = Some(action);
        self
    }

    pub fn then(mut self, line: DialogueLine) -> Self {
        self.then.push(line);
        self
    }

    /// The line shown first; it carries the follow-up.
    pub fn lead_line(&self) -> DialogueLine {
        DialogueLine {
            text: self.text.clone(),
            followup: self.next_action,
            tooltip: None,
        }
    }
}

/// Target pose for the dragon.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Waypoint {
    pub pos: ViewportPos,
    /// Multiplier on the dragon's base width.
    #[serde(default = "default_scale")]
    pub scale: f32,
    /// Flight time to reach this pose.
    #[serde(default = "default_flight_ms")]
    pub duration_ms: u32,
    #[serde(default = "default_flight_easing")]
    pub easing: Easing,
}

fn default_scale() -> f32 {
    1.0
}

fn default_flight_ms() -> u32 {
    2000
}

fn default_flight_easing() -> Easing {
    Easing::CubicInOut
}

impl Waypoint {
    pub fn new(pos: ViewportPos, scale: f32, duration_ms: u32) -> Self {
        Self {
            pos,
            scale,
            duration_ms,
            easing: default_flight_easing(),
        }
    }
}

/// Where a follow-up action takes the dragon and what it says on arrival.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Stop {
    pub waypoint: Waypoint,
    /// Document height fraction the page scrolls to centre.
    pub scroll_fraction: f32,
    /// Override lines spoken on arrival (first shown, rest queued).
    #[serde(default)]
    pub arrival: Vec<DialogueLine>,
    /// Tooltip shown a short delay after arrival.
    #[serde(default)]
    pub tooltip: Option<Tooltip>,
}

/// What a safe reveals in the detail modal. Opaque to the tour.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct PanelContent {
    pub title: String,
    #[serde(default)]
    pub body: String,
    /// Scroll art behind the text.
    #[serde(default = "default_scroll_image")]
    pub image: String,
}

fn default_scroll_image() -> String {
    "/middetailscroll.svg".to_string()
}

/// One safe: its modal, what the dragon says when it closes, and where the
/// dragon waits for it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PanelStep {
    pub content: PanelContent,
    pub closing: SayRequest,
    /// Absent for safe 1, which the dragon introduces from its entry pose.
    #[serde(default)]
    pub approach: Option<Stop>,
}

/// Timing and presentation knobs. Every field has a default, so content
/// files only name what they change.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TourConfig {
    /// Gate safes behind tour progress. When false every safe is free from the start.
    pub enabled: bool,
    pub typing_interval_ms: u32,
    pub advance_delay_ms: u32,
    pub last_line_delay_ms: u32,
    pub tooltip_hide_ms: u32,
    pub tooltip_delay_ms: u32,
    pub scroll_duration_ms: u32,
    pub entry_duration_ms: u32,
    pub bob_period_ms: u32,
    pub bob_amplitude_vh: f32,
    pub wing_flap_ms: u32,
    /// Dragon width in px at scale 1.
    pub dragon_width: f32,
    pub bubble_scale: f32,
}

impl Default for TourConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            typing_interval_ms: 50,
            advance_delay_ms: 2000,
            last_line_delay_ms: 3000,
            tooltip_hide_ms: 5000,
            tooltip_delay_ms: 800,
            scroll_duration_ms: 1200,
            entry_duration_ms: 3000,
            bob_period_ms: 2000,
            bob_amplitude_vh: 2.0,
            wing_flap_ms: 200,
            dragon_width: 300.0,
            bubble_scale: 1.0,
        }
    }
}

/// Content validation failures. Runtime tour logic itself never fails.
#[derive(Debug, thiserror::Error)]
pub enum ContentError {
    #[error("content is not valid JSON: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("expected {expected} safes, found {found}")]
    PanelCount { expected: usize, found: usize },

    #[error("intro script is empty")]
    MissingIntro,

    #[error("safe {panel}: follow-up {action} targets a safe outside 2..=7")]
    FollowupOutOfRange { panel: u8, action: String },

    #[error("safe {0} is a move target but has no approach stop")]
    MissingStop(u8),
}

/// The whole tour.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TourContent {
    #[serde(default)]
    pub config: TourConfig,
    /// Waypoint 0: where the entry flight ends and the intro is spoken.
    pub home: Waypoint,
    /// The fixed initial script.
    pub intro: Vec<DialogueLine>,
    /// Safes 1..=7 in order.
    pub panels: Vec<PanelStep>,
    /// Target of `MoveToEndSequence`.
    pub finale: Stop,
}

impl TourContent {
    /// Parse and validate content JSON.
    pub fn from_json(json: &str) -> Result<Self, ContentError> {
        let content: TourContent = serde_json::from_str(json)?;
        content.validate()?;
        Ok(content)
    }

    /// Check the table is walkable end to end.
    pub fn validate(&self) -> Result<(), ContentError> {
        if self.intro.is_empty() {
            return Err(ContentError::MissingIntro);
        }
        if self.panels.len() != PANEL_COUNT {
            return Err(ContentError::PanelCount {
                expected: PANEL_COUNT,
                found: self.panels.len(),
            });
        }
        for (i, panel) in self.panels.iter().enumerate() {
            let Some(action) = panel.closing.next_action else {
                continue;
            };
            if let FollowupAction::MoveToSafe(n) = action {
                if !(2..=PANEL_COUNT as u8).contains(&n) {
                    return Err(ContentError::FollowupOutOfRange {
                        panel: i as u8 + 1,
                        action: action.tag(),
                    });
                }
                if self.panels[n as usize - 1].approach.is_none() {
                    return Err(ContentError::MissingStop(n));
                }
            }
        }
        Ok(())
    }

    /// Stop a follow-up action flies to.
    pub fn stop_for(&self, action: FollowupAction) -> Option<&Stop> {
        match action {
            FollowupAction::MoveToSafe(n) => self
                .panels
                .get((n as usize).checked_sub(1)?)
                .and_then(|p| p.approach.as_ref()),
            FollowupAction::MoveToEndSequence => Some(&self.finale),
        }
    }

    /// Modal content of safe `n` (1-based).
    pub fn panel(&self, n: u8) -> Option<&PanelStep> {
        self.panels.get((n as usize).checked_sub(1)?)
    }

    /// Built-in resume tour.
    pub fn builtin() -> Self {
        let stop = |vw: f32, vh: f32, scale: f32, ms: u32, scroll: f32, safe: u8, lines: &[&str]| Stop {
            waypoint: Waypoint::new(ViewportPos::vw_vh(vw, vh).offset(-130.0, 0.0), scale, ms),
            scroll_fraction: scroll,
            arrival: lines.iter().map(|t| DialogueLine::new(*t)).collect(),
            tooltip: Some(Tooltip::Safe(safe)),
        };
        let panel = |title: &str, body: &str, closing: SayRequest, approach: Option<Stop>| PanelStep {
            content: PanelContent {
                title: title.to_string(),
                body: body.to_string(),
                image: default_scroll_image(),
            },
            closing,
            approach,
        };

        Self {
            config: TourConfig::default(),
            home: Waypoint::new(ViewportPos::vw_vh(30.0, 20.0).offset(-130.0, 0.0), 1.0, 3000),
            intro: vec![
                DialogueLine::new("Greetings, discerning visitor! Welcome to Zara's digital keep of innovation."),
                DialogueLine::new("I am Toothless, guardian of these realms, here to illuminate the extraordinary talents you seek."),
                DialogueLine::new("Zara is a React Native Developer, a true weaver of digital magic, specializing in the whispers of AI integration."),
                DialogueLine::new("Seven safes are set into the walls of this tower. Each one holds a chapter of her craft."),
                DialogueLine::new("Open the first safe, just below me, and the tale begins.")
                    .with_tooltip(Tooltip::Safe(1)),
            ],
            panels: vec![
                panel(
                    "About Zara",
                    "Mobile engineer who turns product ideas into fast, friendly apps. Happiest where design, data and on-device intelligence meet.",
                    SayRequest::new("Notice the depth of her journey! But the tower goes higher. Follow me to the second safe.")
                        .with_action(FollowupAction::MoveToSafe(2)),
                    None,
                ),
                panel(
                    "Experience",
                    "Senior React Native Developer. Shipped cross-platform apps to millions of users, led migrations to the new architecture, mentored a team of five.",
                    SayRequest::new("Years of battles, all won. The third safe guards what she has built.")
                        .with_action(FollowupAction::MoveToSafe(3)),
                    Some(stop(62.0, 30.0, 0.9, 2000, 0.24, 2, &["The second safe. Her experience lies within."])),
                ),
                panel(
                    "Projects",
                    "Voice-driven journaling app, offline-first field survey tool, real-time fitness coach with on-device pose detection.",
                    SayRequest::new("Impressive creations, are they not? Her tools of the trade wait across the tower.")
                        .with_action(FollowupAction::MoveToSafe(4)),
                    Some(stop(12.0, 35.0, 0.9, 2500, 0.36, 3, &["Here, the third safe. Behold her works."])),
                ),
                panel(
                    "Skills",
                    "TypeScript, React Native, Expo, Swift and Kotlin bridges, GraphQL, Node.js, CI/CD for mobile, automated testing.",
                    SayRequest::new("A well-stocked armoury. Now for the magic she is known for.")
                        .with_action(FollowupAction::MoveToSafe(5)),
                    Some(stop(62.0, 30.0, 0.85, 2200, 0.48, 4, &["The fourth safe holds her arsenal."])),
                ),
                panel(
                    "AI Integration",
                    "LLM-powered assistants, on-device ML with Core ML and TensorFlow Lite, retrieval pipelines, prompt evaluation harnesses.",
                    SayRequest::new("The whispers of AI, tamed. Let us descend to where it all started.")
                        .with_action(FollowupAction::MoveToSafe(6)),
                    Some(stop(12.0, 35.0, 0.85, 2500, 0.6, 5, &["The fifth safe. This is where the real magic lives."])),
                ),
                panel(
                    "Education",
                    "BSc Computer Science. Certificates in machine learning and mobile architecture.",
                    SayRequest::new("Strong foundations make tall towers. One safe remains.")
                        .with_action(FollowupAction::MoveToSafe(7)),
                    Some(stop(62.0, 30.0, 0.8, 2000, 0.72, 6, &["The sixth safe. Her roots."])),
                ),
                panel(
                    "Achievements",
                    "Hackathon winner, conference speaker on mobile AI, open-source maintainer.",
                    SayRequest::new("You have seen every treasure of the keep.")
                        .then(DialogueLine::new("Come, one last flight."))
                        .with_action(FollowupAction::MoveToEndSequence),
                    Some(stop(12.0, 35.0, 0.8, 2500, 0.84, 7, &[
                        "The seventh and final safe.",
                        "Its treasures shine brightest of all.",
                    ])),
                ),
            ],
            finale: Stop {
                waypoint: Waypoint::new(ViewportPos::vw_vh(50.0, 25.0).offset(-150.0, 0.0), 1.0, 3000),
                scroll_fraction: 0.0,
                arrival: vec![
                    DialogueLine::new("Should you wish to take her story with you, the scroll above holds her CV.")
                        .with_tooltip(Tooltip::Cv),
                    DialogueLine::new("And should you wish to summon her, send word through the contact scroll. Farewell, traveller!")
                        .with_tooltip(Tooltip::Contact),
                ],
                tooltip: None,
            },
        }
    }
}

impl Default for TourContent {
    fn default() -> Self {
        Self::builtin()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builtin_is_valid() {
        let content = TourContent::builtin();
        content.validate().unwrap();
        assert!(content.panels[0].closing.text.starts_with("Notice the depth"));
        assert_eq!(
            content.panels[0].closing.next_action,
            Some(FollowupAction::MoveToSafe(2))
        );
        assert_eq!(
            content.panels[6].closing.next_action,
            Some(FollowupAction::MoveToEndSequence)
        );
    }

    #[test]
    fn builtin_round_trips_through_json() {
        let json = serde_json::to_string(&TourContent::builtin()).unwrap();
        let back = TourContent::from_json(&json).unwrap();
        assert_eq!(back, TourContent::builtin());
    }

    #[test]
    fn config_fields_default_individually() {
        let cfg: TourConfig = serde_json::from_str(r#"{ "typing_interval_ms": 10 }"#).unwrap();
        assert_eq!(cfg.typing_interval_ms, 10);
        assert_eq!(cfg.tooltip_hide_ms, 5000);
        assert!(cfg.enabled);
    }

    #[test]
    fn wire_shapes() {
        let a: FollowupAction = serde_json::from_str(r#"{ "move_to_safe": 4 }"#).unwrap();
        assert_eq!(a, FollowupAction::MoveToSafe(4));
        assert_eq!(a.tag(), "move-to-safe-4");
        let t: Tooltip = serde_json::from_str(r#""contact""#).unwrap();
        assert_eq!(t, Tooltip::Contact);
    }

    #[test]
    fn tooltip_stems() {
        assert_eq!(Tooltip::Safe(1).stem(), "safe");
        assert_eq!(Tooltip::Safe(5).stem(), "safe-5");
        assert_eq!(Tooltip::all().count(), 9);
    }

    #[test]
    fn rejects_wrong_panel_count() {
        let mut content = TourContent::builtin();
        content.panels.pop();
        assert!(matches!(
            content.validate(),
            Err(ContentError::PanelCount { expected: 7, found: 6 })
        ));
    }

    #[test]
    fn rejects_out_of_range_followup() {
        let mut content = TourContent::builtin();
        content.panels[2].closing.next_action = Some(FollowupAction::MoveToSafe(9));
        let err = content.validate().unwrap_err();
        assert!(matches!(err, ContentError::FollowupOutOfRange { panel: 3, .. }));
        assert!(err.to_string().contains("move-to-safe-9"));
    }

    #[test]
    fn rejects_target_without_stop() {
        let mut content = TourContent::builtin();
        content.panels[3].approach = None;
        assert!(matches!(content.validate(), Err(ContentError::MissingStop(4))));
    }

    #[test]
    fn rejects_empty_intro_and_bad_json() {
        let mut content = TourContent::builtin();
        content.intro.clear();
        assert!(matches!(content.validate(), Err(ContentError::MissingIntro)));
        assert!(matches!(TourContent::from_json("[]"), Err(ContentError::Parse(_))));
    }

    #[test]
    fn stop_lookup() {
        let content = TourContent::builtin();
        assert!(content.stop_for(FollowupAction::MoveToSafe(1)).is_none());
        assert!(content.stop_for(FollowupAction::MoveToSafe(0)).is_none());
        assert_eq!(
            content.stop_for(FollowupAction::MoveToSafe(3)).unwrap().tooltip,
            Some(Tooltip::Safe(3))
        );
        assert_eq!(content.stop_for(FollowupAction::MoveToEndSequence), Some(&content.finale));
    }
}
