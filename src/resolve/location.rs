//! Location and mode extraction.
//!
//! Physical-venue vocabulary is checked first, then provided conference
//! links, then the usual-link shorthand; anything else is an online meeting
//! with an auto-generated link. Offline matches map onto canonical display
//! names.

use std::sync::LazyLock;

use regex::Regex;

use crate::meeting::{LinkOrigin, LocationSpec, MeetingMode};

// ============================================================================
// Vocabulary
// ============================================================================

/// Phrases that force an offline meeting.
static OFFLINE_PATTERNS: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    [
        r"\bboardroom\b",
        r"\b(?:in|at)\s*(?:the\s*)?office\b",
        r"\bin\s*(?:cabin|cafeteria|pantry|conference)\b",
        r"\bcafeteria\b",
        r"\bconference\s*room\b",
        r"\bin-person\b",
        r"\bface-to-face\b",
        r"\bf2f\b",
        r"\bwe\s*work\b",
        r"\bcoworking\b",
        r"\bshared\s*office\b",
        r"\bmg\s*road\b",
        r"\breception\b",
        r"\bcafe\b",
        r"\brestaurant\b",
        r"\bcoffee\s*shop\b",
        r"\bclinic\b",
        r"\bhospital\b",
        r"\bdentist\b",
        r"\blibrary\b",
        r"\bgym\b",
        r"\bfitness\s*center\b",
        r"\bpark\b",
        r"\bhome\b",
        r"\bhouse\b",
        r"\bat\s*my\s*place\b",
        r"\bat\s*their\s*place\b",
        r"\bclient\s*(?:location|office)\b",
        r"\bvendor\s*office\b",
        r"\bpartner\s*office\b",
        r"\bproject\s*site\b",
        r"\bworksite\b",
        r"\bconstruction\s*site\b",
        r"\bevent\s*venue\b",
        r"\bconference\s*center\b",
        r"\bmeeting\s*room\b",
        r"\btraining\s*room\b",
        r"\bseminar\s*room\b",
        r"\bwork\s*shop\b",
    ]
    .into_iter()
    .map(|pattern| Regex::new(pattern).expect("Invalid regex"))
    .collect()
});

/// Phrases that mark an online meeting without naming a link.
static ONLINE_PATTERNS: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    [
        r"\bgmeet\b",
        r"\bgoogle\s*meet\b",
        r"\bmeet\.google\.com\b",
        r"\bzoom\b",
        r"\bteams\b",
        r"\bwebex\b",
        r"\bmeetup\b",
        r"\bdiscord\b",
        r"\bslack\s*call\b",
        r"\bskype\b",
        r"\bhangouts\b",
        r"\bfacetime\b",
        r"\bonline\b",
        r"\bvirtual\b",
        r"\bvideo\s*call\b",
        r"\bvideo\s*meeting\b",
        r"\bweb\s*call\b",
        r"\bwebinar\b",
        r"\bweb\s*conference\b",
        r"\bvc\b",
        r"\bvideo\s*conference\b",
        r"\bteleconference\b",
        r"\bphone\s*call\b",
        r"\btelephone\s*meeting\b",
    ]
    .into_iter()
    .map(|pattern| Regex::new(pattern).expect("Invalid regex"))
    .collect()
});

static IN_PERSON_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\bin\s+person\b|\boffline\b").expect("Invalid regex"));

/// "our usual link" and friends: the executor should reuse an existing link
/// rather than generate one.
static USUAL_LINK_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\b(?:usual|regular|default)\b").expect("Invalid regex"));

// ============================================================================
// Links
// ============================================================================

static MEET_LINK_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)(?:https?://)?(?:[a-z]{2,3}-)?meet\.google\.com/[a-z0-9_-]+")
        .expect("Invalid regex")
});

static ZOOM_LINK_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)(?:https?://)?zoom\.us/(?:j/[0-9]+|my/[a-z0-9._-]+)").expect("Invalid regex")
});

static TEAMS_LINK_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)(?:https?://)?teams\.microsoft\.com/l/meetup-join/[a-z0-9_%/-]+")
        .expect("Invalid regex")
});

static GENERIC_URL_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)https?://[a-z0-9][-a-z0-9]*(?:\.[a-z0-9][-a-z0-9]*)+(?:/[^\s]*)?")
        .expect("Invalid regex")
});

// ============================================================================
// Offline display names
// ============================================================================

static ROOM_LETTER_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\bconference\s*room\s*([a-z]+)\b").expect("Invalid regex"));

static BOARDROOM_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\bboardroom\b").expect("Invalid regex"));

/// Canonical venue names, first match wins.
static OFFLINE_DISPLAY_NAMES: LazyLock<Vec<(Regex, &'static str)>> = LazyLock::new(|| {
    [
        (r"\bconference\s*room\b", "Conference Room"),
        (r"\bmeeting\s*room\b", "Meeting Room"),
        (r"\btraining\s*room\b", "Training Room"),
        (r"\bcabin\b", "Cabin"),
        (r"\bcafeteria\b", "Cafeteria"),
        (r"\bpantry\b", "Pantry"),
        (r"\breception\s*lounge\b", "Reception Lounge"),
        (r"\breception\b", "Reception"),
        (r"\bwework\s*mg\s*road\b", "WeWork MG Road"),
        (r"\bwework\b", "WeWork"),
        (r"\bcoworking\s*space\b", "Coworking Space"),
        (r"\bdentist\s*office\b", "Dentist Office"),
        (r"\bdentist\b", "Dentist"),
        (r"\bclinic\b", "Clinic"),
        (r"\bhospital\b", "Hospital"),
        (r"\bdoctor.*office\b", "Doctor's Office"),
        (r"\bgym\b", "Gym"),
        (r"\bfitness\s*center\b", "Fitness Center"),
        (r"\byoga\s*studio\b", "Yoga Studio"),
        (r"\bfitness\s*studio\b", "Fitness Studio"),
        (r"\bcafe\b", "Cafe"),
        (r"\bcoffee\s*shop\b", "Coffee Shop"),
        (r"\brestaurant\b", "Restaurant"),
        (r"\blibrary\b", "Library"),
        (r"\buniversity\b", "University"),
        (r"\bcollege\b", "College"),
        (r"\bschool\b", "School"),
        (r"\bpark\b", "Park"),
        (r"\bgarden\b", "Garden"),
        (r"\bhome\b", "Home"),
        (r"\bhouse\b", "House"),
        (r"\bat\s*my\s*place\b", "My Place"),
        (r"\bat\s*their\s*place\b", "Their Place"),
        (r"\bclient\s*location\b", "Client Location"),
        (r"\bclient\s*office\b", "Client Office"),
        (r"\bvendor\s*office\b", "Vendor Office"),
        (r"\bpartner\s*office\b", "Partner Office"),
        (r"\bproject\s*site\b", "Project Site"),
        (r"\bworksite\b", "Worksite"),
        (r"\bevent\s*venue\b", "Event Venue"),
        (r"\bconference\s*center\b", "Conference Center"),
        (r"\boffice\b", "Office"),
    ]
    .into_iter()
    .map(|(pattern, name)| (Regex::new(pattern).expect("Invalid regex"), name))
    .collect()
});

static AT_VENUE_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"\bat\s+(?:the\s+)?(cafe|restaurant|shop|store|mall|building|floor|street|road|library|gym|park|home|house|office|lab|studio|center|venue|place)\b",
    )
    .expect("Invalid regex")
});

static ORDINAL_FLOOR_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\b(\d+)(st|nd|rd|th)\s*floor\b").expect("Invalid regex"));

static FLOOR_NUMBER_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\bfloor\s*(\d+)\b").expect("Invalid regex"));

// ============================================================================
// Resolution
// ============================================================================

/// Resolve the location and mode for one sentence.
pub fn resolve(text: &str) -> LocationSpec {
    let lowered = text.to_lowercase();

    for pattern in OFFLINE_PATTERNS.iter() {
        if pattern.is_match(&lowered) {
            return offline_spec(&lowered);
        }
    }

    let is_online = ONLINE_PATTERNS.iter().any(|p| p.is_match(&lowered));
    if !is_online && IN_PERSON_PATTERN.is_match(&lowered) {
        return offline_spec(&lowered);
    }

    online_spec(text, &lowered)
}

/// A provided conference link, by platform then any URL. Matching runs on
/// the raw text so the link's casing survives.
pub fn extract_link(text: &str) -> Option<String> {
    for pattern in [
        &*MEET_LINK_PATTERN,
        &*ZOOM_LINK_PATTERN,
        &*TEAMS_LINK_PATTERN,
        &*GENERIC_URL_PATTERN,
    ] {
        if let Some(found) = pattern.find(text) {
            return Some(ensure_scheme(found.as_str()));
        }
    }
    None
}

fn online_spec(raw: &str, lowered: &str) -> LocationSpec {
    if let Some(link) = extract_link(raw) {
        return LocationSpec {
            mode: MeetingMode::Online,
            location_text: link.clone(),
            meeting_link: Some(link),
            link_origin: LinkOrigin::Provided,
        };
    }
    if USUAL_LINK_PATTERN.is_match(lowered) {
        return LocationSpec {
            mode: MeetingMode::Online,
            location_text: "Online".to_string(),
            meeting_link: None,
            link_origin: LinkOrigin::Provided,
        };
    }
    LocationSpec::default()
}

fn offline_spec(lowered: &str) -> LocationSpec {
    LocationSpec {
        mode: MeetingMode::Offline,
        location_text: offline_display(lowered),
        meeting_link: None,
        link_origin: LinkOrigin::Provided,
    }
}

fn offline_display(text: &str) -> String {
    if BOARDROOM_PATTERN.is_match(text) {
        return "Boardroom".to_string();
    }
    if let Some(caps) = ROOM_LETTER_PATTERN.captures(text) {
        return format!("Conference Room {}", caps[1].to_uppercase());
    }
    for (pattern, name) in OFFLINE_DISPLAY_NAMES.iter() {
        if pattern.is_match(text) {
            return (*name).to_string();
        }
    }
    if let Some(caps) = AT_VENUE_PATTERN.captures(text) {
        return title_case(&caps[1]);
    }
    if let Some(caps) = ORDINAL_FLOOR_PATTERN.captures(text) {
        return format!("{}{} Floor", &caps[1], &caps[2]);
    }
    if let Some(caps) = FLOOR_NUMBER_PATTERN.captures(text) {
        return format!("Floor {}", &caps[1]);
    }
    "TBD".to_string()
}

fn ensure_scheme(link: &str) -> String {
    if link.len() >= 4 && link[..4].eq_ignore_ascii_case("http") {
        link.to_string()
    } else {
        format!("https://{link}")
    }
}

fn title_case(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().collect::<String>() + chars.as_str(),
        None => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_auto_generated_online() {
        let spec = resolve("meeting with John tomorrow at 6pm");
        assert_eq!(spec.mode, MeetingMode::Online);
        assert_eq!(spec.location_text, "Online");
        assert_eq!(spec.link_origin, LinkOrigin::AutoGenerate);
        assert_eq!(spec.meeting_link, None);
    }

    #[test]
    fn test_boardroom() {
        let spec = resolve("review in the boardroom at 3pm");
        assert_eq!(spec.mode, MeetingMode::Offline);
        assert_eq!(spec.location_text, "Boardroom");
        assert_eq!(spec.meeting_link, None);
    }

    #[test]
    fn test_lettered_conference_room() {
        let spec = resolve("sync in conference room b");
        assert_eq!(spec.location_text, "Conference Room B");
    }

    #[test]
    fn test_office_display_name() {
        let spec = resolve("catch up in the office at 11");
        assert_eq!(spec.mode, MeetingMode::Offline);
        assert_eq!(spec.location_text, "Office");
    }

    #[test]
    fn test_meet_link_preserves_casing() {
        let spec = resolve("join at meet.google.com/Abc-Defg-Hij");
        assert_eq!(spec.mode, MeetingMode::Online);
        assert_eq!(
            spec.meeting_link.as_deref(),
            Some("https://meet.google.com/Abc-Defg-Hij")
        );
        assert_eq!(spec.link_origin, LinkOrigin::Provided);
    }

    #[test]
    fn test_zoom_link() {
        let spec = resolve("call on https://zoom.us/j/123456789");
        assert_eq!(spec.meeting_link.as_deref(), Some("https://zoom.us/j/123456789"));
        assert_eq!(spec.link_origin, LinkOrigin::Provided);
    }

    #[test]
    fn test_zoom_personal_link() {
        let spec = resolve("join zoom.us/my/jane.smith at 4pm");
        assert_eq!(spec.meeting_link.as_deref(), Some("https://zoom.us/my/jane.smith"));
    }

    #[test]
    fn test_generic_url() {
        let spec = resolve("demo at https://example.com/room/42");
        assert_eq!(spec.meeting_link.as_deref(), Some("https://example.com/room/42"));
    }

    #[test]
    fn test_usual_link_skips_generation() {
        let spec = resolve("zoom call on the usual link");
        assert_eq!(spec.mode, MeetingMode::Online);
        assert_eq!(spec.meeting_link, None);
        assert_eq!(spec.link_origin, LinkOrigin::Provided);
    }

    #[test]
    fn test_online_keyword_without_link() {
        let spec = resolve("quick zoom call with Bob");
        assert_eq!(spec.mode, MeetingMode::Online);
        assert_eq!(spec.link_origin, LinkOrigin::AutoGenerate);
    }

    #[test]
    fn test_in_person_without_venue() {
        let spec = resolve("let's meet in person");
        assert_eq!(spec.mode, MeetingMode::Offline);
        assert_eq!(spec.location_text, "TBD");
    }

    #[test]
    fn test_generic_venue_after_in_person() {
        let spec = resolve("in-person at the mall");
        assert_eq!(spec.mode, MeetingMode::Offline);
        assert_eq!(spec.location_text, "Mall");
    }

    #[test]
    fn test_ordinal_floor() {
        let spec = resolve("f2f on the 3rd floor");
        assert_eq!(spec.location_text, "3rd Floor");
    }

    #[test]
    fn test_cafe_display_name() {
        let spec = resolve("coffee at the cafe tomorrow morning");
        assert_eq!(spec.mode, MeetingMode::Offline);
        assert_eq!(spec.location_text, "Cafe");
    }
}
