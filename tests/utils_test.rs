use chrono::NaiveDate;
use scrobblesync::types::SyncWindow;
use scrobblesync::utils::*;

fn weekly() -> SyncWindow {
    SyncWindow::new("7day", "weekly-playlist", 20)
}

#[test]
fn test_generate_state() {
    let state = generate_state();

    assert_eq!(state.len(), 16);
    assert!(state.chars().all(|c| c.is_ascii_alphanumeric()));

    // Two generated nonces should be different
    assert_ne!(state, generate_state());
}

#[test]
fn test_basic_auth_header() {
    // base64("id:secret")
    assert_eq!(basic_auth_header("id", "secret"), "Basic aWQ6c2VjcmV0");
}

#[test]
fn test_normalize_query_field_strips_quotes_and_lowercases() {
    assert_eq!(normalize_query_field("Don't Stop"), "dont stop");
    assert_eq!(normalize_query_field("\"Heroes\""), "heroes");
    assert_eq!(normalize_query_field("JOURNEY"), "journey");
}

#[test]
fn test_normalize_query_field_only_replaces_first_hyphen() {
    assert_eq!(normalize_query_field("Jay-Z"), "jay z");
    assert_eq!(
        normalize_query_field("Song - Live - Remastered"),
        "song   live - remastered"
    );
}

#[test]
fn test_normalized_inputs_produce_same_query() {
    assert_eq!(
        search_query("Don't Stop", "Journey"),
        search_query("dont stop", "journey")
    );
    assert_eq!(
        search_query("Don't Stop", "Journey"),
        "track:\"dont stop\" artist:\"journey\""
    );
}

#[test]
fn test_match_key_ignores_case_and_quotes_only() {
    assert_eq!(match_key("Don't Stop"), match_key("dont stop"));
    assert_eq!(match_key("HEROES"), match_key("\"heroes\""));

    // hyphens and remix tags still matter
    assert_ne!(match_key("Jay-Z"), match_key("Jay Z"));
    assert_ne!(match_key("Song"), match_key("Song - Remastered"));
}

#[test]
fn test_playlist_description_all_found() {
    let date = NaiveDate::from_ymd_opt(2024, 3, 9).unwrap();
    let text = playlist_description(&weekly(), 120, 0, date);

    assert!(text.contains("last 7 days"));
    assert!(text.contains("120 plays"));
    assert!(text.contains("All tracks found"));
    assert!(text.contains("2024-03-09"));
}

#[test]
fn test_playlist_description_reports_missing_tracks() {
    let date = NaiveDate::from_ymd_opt(2024, 3, 9).unwrap();

    let one = playlist_description(&weekly(), 10, 1, date);
    assert!(one.contains("1 track could not be found"));

    let many = playlist_description(&weekly(), 10, 7, date);
    assert!(many.contains("7 tracks could not be found"));
    assert!(!many.contains("All tracks found"));
}

#[test]
fn test_parse_retry_after() {
    assert_eq!(parse_retry_after(Some("3")), 3);
    assert_eq!(parse_retry_after(Some(" 12 ")), 12);
    assert_eq!(parse_retry_after(Some("soon")), 1);
    assert_eq!(parse_retry_after(None), 1);
}

#[test]
fn test_window_labels() {
    assert_eq!(SyncWindow::new("7day", "a", 1).label(), "last 7 days");
    assert_eq!(SyncWindow::new("1month", "a", 1).label(), "last month");
    assert_eq!(SyncWindow::new("overall", "a", 1).label(), "all time");
    assert_eq!(SyncWindow::new("12month", "a", 1).label(), "12month");
}
