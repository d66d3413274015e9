//! Addressable sections of the site aggregate
//!
//! Every dashboard PUT route maps to one [`Section`]. Payloads are
//! canonicalized through typed shapes: deserializing validates required
//! fields, re-serializing drops unknown keys and fills defaults, so the
//! stored value, the HTTP response and the broadcast payload are all the
//! same JSON.

use serde::{de::DeserializeOwned, Deserialize, Serialize};
use serde_json::Value as JsonValue;

use crate::types::RoostError;

/// Array item ids arrive as strings from seeded content and as
/// `Date.now()` numbers from the dashboard; both are accepted and
/// preserved as-is.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(untagged)]
pub enum ItemId {
    Num(serde_json::Number),
    Text(String),
}

impl ItemId {
    pub fn matches(&self, id: &str) -> bool {
        match self {
            ItemId::Num(n) => n.to_string() == id,
            ItemId::Text(s) => s == id,
        }
    }
}

fn default_true() -> bool {
    true
}

fn default_intro_video() -> String {
    "/intro.mp4".to_string()
}

fn default_chatbot_name() -> String {
    "Tec".to_string()
}

fn default_chatbot_welcome() -> String {
    "Hi! I'm Tec, the TechNest assistant. How can I help you today?".to_string()
}

/// Intro video overlay settings; every field has a default so `{}` is a
/// valid payload
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IntroSection {
    #[serde(default = "default_true")]
    pub enabled: bool,
    #[serde(default = "default_intro_video")]
    pub video_url: String,
    #[serde(default)]
    pub poster_url: String,
    #[serde(default = "default_true")]
    pub autoplay: bool,
    #[serde(rename = "loop", default = "default_true")]
    pub loop_video: bool,
}

/// Home hero banner
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HeroSection {
    pub title: String,
    pub subtitle: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub video_url: Option<String>,
    pub cta1: String,
    pub cta2: String,
}

/// Heading plus body text, used by `home.vision` and `about.story`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TitleText {
    pub title: String,
    pub text: String,
}

/// Heading plus subheading, used by `join.hero`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TitleSubtitle {
    pub title: String,
    pub subtitle: String,
}

/// Icon card used by `home.whatWeDo`, `about.values` and `join.whyJoinUs`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CardItem {
    pub id: ItemId,
    pub title: String,
    pub description: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub icon: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Partner {
    pub id: ItemId,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub logo_url: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TeamMember {
    pub id: ItemId,
    pub name: String,
    pub role: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bio: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub photo_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub linkedin: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub github: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Socials {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub facebook: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub twitter: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub instagram: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub linkedin: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub discord: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub github: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub youtube: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FaqItem {
    pub id: ItemId,
    pub question: String,
    pub answer: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ContactSection {
    pub message: String,
    pub email: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub discord: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    #[serde(default)]
    pub socials: Socials,
    #[serde(default)]
    pub faq: Vec<FaqItem>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Position {
    pub id: ItemId,
    pub title: String,
    pub description: String,
    /// Free-text requirements line shown on the position card
    #[serde(default)]
    pub requirements: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Statistic {
    pub id: ItemId,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub icon: Option<String>,
    /// Numeric, animated by the counter widget
    pub value: serde_json::Number,
    #[serde(default)]
    pub suffix: String,
    pub label: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TestimonialEntry {
    pub id: ItemId,
    pub name: String,
    pub role: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
    pub rating: u8,
    pub text: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Technology {
    pub id: ItemId,
    pub category: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub icon: Option<String>,
    #[serde(default)]
    pub items: Vec<String>,
}

/// Blog gallery entry, `kind` is "image" or "video"
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BlogMediaItem {
    #[serde(rename = "type")]
    pub kind: String,
    pub url: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub caption: Option<String>,
}

/// A blog post inside the aggregate's `blog` array
///
/// `id` and `date` are optional on input; the create handler fills them.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BlogPost {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<ItemId>,
    pub title: String,
    #[serde(default)]
    pub excerpt: String,
    #[serde(default)]
    pub content: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
    #[serde(default)]
    pub media_gallery: Vec<BlogMediaItem>,
    #[serde(default)]
    pub author: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date: Option<String>,
    #[serde(default)]
    pub category: String,
    #[serde(default)]
    pub tags: Vec<String>,
}

/// Per-page SEO entry, one for each of the five site pages
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SeoEntry {
    pub title: String,
    pub description: String,
    #[serde(default)]
    pub og_image: String,
}

/// Pages that carry an SEO entry
pub const SEO_PAGES: [&str; 5] = ["home", "projects", "about", "contact", "join"];

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatbotSettings {
    #[serde(default = "default_true")]
    pub enabled: bool,
    #[serde(default = "default_chatbot_name")]
    pub name: String,
    #[serde(default = "default_chatbot_welcome")]
    pub welcome_message: String,
}

fn canonicalize<T>(key: &str, payload: JsonValue) -> Result<JsonValue, RoostError>
where
    T: DeserializeOwned + Serialize,
{
    let typed: T = serde_json::from_value(payload)
        .map_err(|e| RoostError::Validation(format!("invalid {} payload: {}", key, e)))?;
    serde_json::to_value(&typed)
        .map_err(|e| RoostError::Internal(format!("reserialize {}: {}", key, e)))
}

/// One addressable sub-path of the aggregate, mutated by a dashboard PUT
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Section {
    Intro,
    HomeHero,
    HomeWhatWeDo,
    HomeVision,
    HomePartners,
    AboutStory,
    AboutTeam,
    AboutValues,
    Contact,
    JoinHero,
    JoinWhyJoinUs,
    JoinPositions,
    Statistics,
    Testimonials,
    Technologies,
    ChatbotSettings,
}

impl Section {
    pub const ALL: [Section; 16] = [
        Section::Intro,
        Section::HomeHero,
        Section::HomeWhatWeDo,
        Section::HomeVision,
        Section::HomePartners,
        Section::AboutStory,
        Section::AboutTeam,
        Section::AboutValues,
        Section::Contact,
        Section::JoinHero,
        Section::JoinWhyJoinUs,
        Section::JoinPositions,
        Section::Statistics,
        Section::Testimonials,
        Section::Technologies,
        Section::ChatbotSettings,
    ];

    /// Resolve a PUT route path to its section
    pub fn from_put_path(path: &str) -> Option<Self> {
        match path {
            "/api/intro" => Some(Self::Intro),
            "/api/home/hero" => Some(Self::HomeHero),
            "/api/home/whatwedo" => Some(Self::HomeWhatWeDo),
            "/api/home/vision" => Some(Self::HomeVision),
            "/api/home/partners" => Some(Self::HomePartners),
            "/api/about/story" => Some(Self::AboutStory),
            "/api/about/team" => Some(Self::AboutTeam),
            "/api/about/values" => Some(Self::AboutValues),
            "/api/contact" => Some(Self::Contact),
            "/api/join/hero" => Some(Self::JoinHero),
            "/api/join/whyjoin" => Some(Self::JoinWhyJoinUs),
            "/api/join/positions" => Some(Self::JoinPositions),
            "/api/statistics" => Some(Self::Statistics),
            "/api/testimonials" => Some(Self::Testimonials),
            "/api/technologies" => Some(Self::Technologies),
            "/api/chatbot/settings" => Some(Self::ChatbotSettings),
            _ => None,
        }
    }

    /// Key broadcast to subscribers and consumed by the projection cache.
    /// Never more than two dot-separated segments.
    pub fn broadcast_key(&self) -> &'static str {
        match self {
            Self::Intro => "intro",
            Self::HomeHero => "home.hero",
            Self::HomeWhatWeDo => "home.whatWeDo",
            Self::HomeVision => "home.vision",
            Self::HomePartners => "home.partners",
            Self::AboutStory => "about.story",
            Self::AboutTeam => "about.team",
            Self::AboutValues => "about.values",
            Self::Contact => "contact",
            Self::JoinHero => "join.hero",
            Self::JoinWhyJoinUs => "join.whyJoinUs",
            Self::JoinPositions => "join.positions",
            Self::Statistics => "statistics",
            Self::Testimonials => "testimonials",
            Self::Technologies => "technologies",
            Self::ChatbotSettings => "chatbot",
        }
    }

    /// Storage location inside the aggregate document
    pub fn segments(&self) -> (&'static str, Option<&'static str>) {
        match self.broadcast_key().split_once('.') {
            Some((top, sub)) => (top, Some(sub)),
            None => (self.broadcast_key(), None),
        }
    }

    /// Validate and canonicalize a PUT payload
    pub fn validate(&self, payload: JsonValue) -> Result<JsonValue, RoostError> {
        let key = self.broadcast_key();
        match self {
            Self::Intro => canonicalize::<IntroSection>(key, payload),
            Self::HomeHero => canonicalize::<HeroSection>(key, payload),
            Self::HomeWhatWeDo => canonicalize::<Vec<CardItem>>(key, payload),
            Self::HomeVision => canonicalize::<TitleText>(key, payload),
            Self::HomePartners => canonicalize::<Vec<Partner>>(key, payload),
            Self::AboutStory => canonicalize::<TitleText>(key, payload),
            Self::AboutTeam => canonicalize::<Vec<TeamMember>>(key, payload),
            Self::AboutValues => canonicalize::<Vec<CardItem>>(key, payload),
            Self::Contact => canonicalize::<ContactSection>(key, payload),
            Self::JoinHero => canonicalize::<TitleSubtitle>(key, payload),
            Self::JoinWhyJoinUs => canonicalize::<Vec<CardItem>>(key, payload),
            Self::JoinPositions => canonicalize::<Vec<Position>>(key, payload),
            Self::Statistics => canonicalize::<Vec<Statistic>>(key, payload),
            Self::Testimonials => canonicalize::<Vec<TestimonialEntry>>(key, payload),
            Self::Technologies => canonicalize::<Vec<Technology>>(key, payload),
            Self::ChatbotSettings => canonicalize::<ChatbotSettings>(key, payload),
        }
    }
}

/// Validate one SEO page entry
pub fn validate_seo_entry(payload: JsonValue) -> Result<JsonValue, RoostError> {
    canonicalize::<SeoEntry>("seo", payload)
}

/// Validate a blog post shape
pub fn validate_blog_post(payload: JsonValue) -> Result<JsonValue, RoostError> {
    canonicalize::<BlogPost>("blog", payload)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_every_route_maps_to_its_section() {
        let routes = [
            ("/api/intro", Section::Intro),
            ("/api/home/hero", Section::HomeHero),
            ("/api/home/whatwedo", Section::HomeWhatWeDo),
            ("/api/home/vision", Section::HomeVision),
            ("/api/home/partners", Section::HomePartners),
            ("/api/about/story", Section::AboutStory),
            ("/api/about/team", Section::AboutTeam),
            ("/api/about/values", Section::AboutValues),
            ("/api/contact", Section::Contact),
            ("/api/join/hero", Section::JoinHero),
            ("/api/join/whyjoin", Section::JoinWhyJoinUs),
            ("/api/join/positions", Section::JoinPositions),
            ("/api/statistics", Section::Statistics),
            ("/api/testimonials", Section::Testimonials),
            ("/api/technologies", Section::Technologies),
            ("/api/chatbot/settings", Section::ChatbotSettings),
        ];
        assert_eq!(routes.len(), Section::ALL.len());
        for (path, section) in routes {
            assert_eq!(Section::from_put_path(path), Some(section));
        }
        assert_eq!(Section::from_put_path("/api/nope"), None);
    }

    #[test]
    fn test_broadcast_keys_have_at_most_two_segments() {
        // The projection cache walks one dot; deeper keys would be dropped
        for section in Section::ALL {
            let key = section.broadcast_key();
            assert!(
                key.split('.').count() <= 2,
                "key {} has too many segments",
                key
            );
            assert!(!key.is_empty());
        }
        assert!("seo".split('.').count() <= 2);
        assert!("blog".split('.').count() <= 2);
    }

    #[test]
    fn test_segments_match_broadcast_key() {
        assert_eq!(Section::HomeHero.segments(), ("home", Some("hero")));
        assert_eq!(Section::Intro.segments(), ("intro", None));
        assert_eq!(Section::ChatbotSettings.segments(), ("chatbot", None));
        assert_eq!(
            Section::JoinWhyJoinUs.segments(),
            ("join", Some("whyJoinUs"))
        );
    }

    #[test]
    fn test_hero_requires_title_and_ctas() {
        let valid = json!({
            "title": "TechNest",
            "subtitle": "Crafting Immersive Gaming Experiences",
            "cta1": "Explore Projects",
            "cta2": "Join Us"
        });
        let stored = Section::HomeHero.validate(valid.clone()).unwrap();
        assert_eq!(stored, valid);

        let missing_cta = json!({ "title": "TechNest", "subtitle": "x", "cta1": "a" });
        assert!(Section::HomeHero.validate(missing_cta).is_err());
    }

    #[test]
    fn test_story_rejects_empty_object() {
        assert!(Section::AboutStory.validate(json!({})).is_err());
        assert!(Section::AboutStory
            .validate(json!({ "title": "Our Story", "text": "Founded in 2020" }))
            .is_ok());
    }

    #[test]
    fn test_canonicalization_drops_unknown_keys() {
        let payload = json!({
            "title": "Our Vision",
            "text": "Build worlds",
            "injected": "nope"
        });
        let stored = Section::HomeVision.validate(payload).unwrap();
        assert!(stored.get("injected").is_none());
        assert_eq!(stored["title"], "Our Vision");
    }

    #[test]
    fn test_intro_accepts_empty_payload_with_defaults() {
        let stored = Section::Intro.validate(json!({})).unwrap();
        assert_eq!(stored["enabled"], true);
        assert_eq!(stored["videoUrl"], "/intro.mp4");
        assert_eq!(stored["loop"], true);
    }

    #[test]
    fn test_array_sections_accept_numeric_and_string_ids() {
        let payload = json!([
            { "id": "1", "title": "Game Development", "description": "d", "icon": "Gamepad2" },
            { "id": 1736882400000i64, "title": "VR", "description": "d" }
        ]);
        let stored = Section::HomeWhatWeDo.validate(payload).unwrap();
        assert_eq!(stored[0]["id"], "1");
        assert_eq!(stored[1]["id"], 1736882400000i64);
        // icon omitted stays omitted
        assert!(stored[1].get("icon").is_none());
    }

    #[test]
    fn test_array_section_rejects_object_payload() {
        assert!(Section::AboutTeam.validate(json!({ "name": "x" })).is_err());
    }

    #[test]
    fn test_seo_entry_defaults_og_image() {
        let stored = validate_seo_entry(json!({
            "title": "TechNest | Home",
            "description": "Game studio"
        }))
        .unwrap();
        assert_eq!(stored["ogImage"], "");
    }

    #[test]
    fn test_blog_post_requires_title_only() {
        let post = validate_blog_post(json!({ "title": "Dev log #1" })).unwrap();
        assert_eq!(post["title"], "Dev log #1");
        assert_eq!(post["tags"], json!([]));
        assert!(post.get("id").is_none());

        assert!(validate_blog_post(json!({ "excerpt": "no title" })).is_err());
    }

    #[test]
    fn test_item_id_matches() {
        let text = ItemId::Text("42".to_string());
        let num: ItemId = serde_json::from_value(json!(42)).unwrap();
        assert!(text.matches("42"));
        assert!(num.matches("42"));
        assert!(!num.matches("43"));
    }
}
