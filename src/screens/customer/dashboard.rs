//! Dashboard - profile snapshot with segment and subscription badges

use crate::models::UserProfile;

pub fn goal_label(tag: Option<&str>) -> &'static str {
    match tag {
        Some("make_money") => "Make money",
        Some("get_clients") => "Get clients",
        Some("automate_business") => "Automate business",
        Some(_) => "Other",
        None => "-",
    }
}

pub fn level_label(tag: Option<&str>) -> &'static str {
    match tag {
        Some("beginner") => "Beginner",
        Some("freelancer") => "Freelancer",
        Some("business") => "Business",
        Some(_) => "Other",
        None => "-",
    }
}

pub fn segment_label(segment: &str) -> &'static str {
    match segment {
        "hot" => "Hot lead",
        "nurture" => "Nurture",
        _ => "Content",
    }
}

pub fn greeting(profile: &UserProfile) -> String {
    let name = profile
        .name
        .as_deref()
        .filter(|n| !n.trim().is_empty())
        .unwrap_or("friend");
    format!("Hello, {}!", name)
}

pub fn subscription_badge(profile: &UserProfile) -> &'static str {
    if profile.has_active_subscription() {
        "Active"
    } else {
        "Not active"
    }
}

pub fn next_action(profile: &UserProfile) -> &'static str {
    if profile.has_active_subscription() {
        "Continue the club lessons and invite your friends!"
    } else {
        "Watch the free course and join the club!"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn profile(status: &str) -> UserProfile {
        serde_json::from_value(serde_json::json!({
            "telegram_id": 1,
            "name": "Jasur",
            "goal_tag": "make_money",
            "lead_segment": "hot",
            "subscription_status": status,
        }))
        .unwrap()
    }

    #[test]
    fn test_labels() {
        let p = profile("active");
        assert_eq!(goal_label(p.goal_tag.as_deref()), "Make money");
        assert_eq!(level_label(p.level_tag.as_deref()), "-");
        assert_eq!(segment_label(&p.lead_segment), "Hot lead");
        assert_eq!(greeting(&p), "Hello, Jasur!");
    }

    #[test]
    fn test_subscription_branch() {
        assert_eq!(subscription_badge(&profile("active")), "Active");
        assert_eq!(subscription_badge(&profile("expired")), "Not active");
        assert!(next_action(&profile("inactive")).starts_with("Watch"));
    }
}
