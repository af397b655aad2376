use mapview_wasm::{DemoConfig, HashFormat, HashIssue, HashSync, NamedLocation, ViewState};
use pretty_assertions::assert_eq;

const NEW_YORK: (f64, f64, i32) = (40.70531887544228, -74.00976419448853, 16);

fn comma(fragment: &str) -> (ViewState, Vec<HashIssue>) {
    let config = DemoConfig::default();
    let parsed = HashSync::with_format(&config, HashFormat::Comma).parse(fragment);
    (parsed.state, parsed.issues)
}

fn slash(fragment: &str) -> (ViewState, Vec<HashIssue>) {
    let config = DemoConfig::default();
    let parsed = HashSync::with_format(&config, HashFormat::Slash).parse(fragment);
    (parsed.state, parsed.issues)
}

fn position(state: &ViewState) -> (f64, f64, i32) {
    (state.lat, state.lng, state.zoom)
}

fn round_trip(fragment: &str) -> String {
    let config = DemoConfig::default();
    let sync = HashSync::new(&config);
    sync.serialize(&sync.parse(fragment).state)
}

#[test]
fn full_fragment_sets_source_and_position() {
    let (state, issues) = comma("mapzen,40.7,-74.0,16");
    assert_eq!(state.source_id, "mapzen");
    assert_eq!(position(&state), (40.7, -74.0, 16));
    assert!(state.flags().is_empty());
    assert!(issues.is_empty());
}

#[test]
fn unknown_single_token_falls_back_to_defaults() {
    let (state, issues) = comma("bogus");
    assert_eq!(state.source_id, "mapzen");
    assert_eq!(position(&state), NEW_YORK);
    assert_eq!(issues, vec![HashIssue::UnknownSource("bogus".to_string())]);
}

#[test]
fn empty_fragment_is_silent() {
    for fragment in ["", "#"] {
        let (state, issues) = comma(fragment);
        assert_eq!(state.source_id, "mapzen");
        assert_eq!(position(&state), NEW_YORK);
        assert!(issues.is_empty());
    }
}

#[test]
fn source_and_location_name() {
    let (state, issues) = comma("#mapzen,London");
    assert_eq!(state.source_id, "mapzen");
    assert_eq!(position(&state), (51.508, -0.105, 15));
    assert!(issues.is_empty());
}

#[test]
fn unknown_location_name_uses_start_location() {
    let (state, issues) = comma("mapzen,Atlantis");
    assert_eq!(position(&state), NEW_YORK);
    assert_eq!(issues, vec![HashIssue::UnknownLocation("Atlantis".to_string())]);
}

#[test]
fn source_and_location_fall_back_independently() {
    let (state, issues) = comma("bogus,Seattle");
    assert_eq!(state.source_id, "mapzen");
    assert_eq!(position(&state), (47.609722, -122.333056, 15));
    assert_eq!(issues, vec![HashIssue::UnknownSource("bogus".to_string())]);
}

#[test]
fn three_tokens_are_a_bare_position() {
    let (state, issues) = comma("51.5,-0.1,14");
    assert_eq!(state.source_id, "mapzen");
    assert_eq!(position(&state), (51.5, -0.1, 14));
    assert!(issues.is_empty());
}

#[test]
fn malformed_number_drops_position_but_keeps_source() {
    let (state, issues) = comma("mapzen,abc,-74,16");
    assert_eq!(state.source_id, "mapzen");
    assert_eq!(position(&state), NEW_YORK);
    assert_eq!(
        issues,
        vec![HashIssue::MalformedNumeric {
            field: "latitude",
            token: "abc".to_string(),
        }]
    );
}

#[test]
fn out_of_range_values_are_clamped() {
    let (state, _) = comma("mapzen,95,-190,25");
    assert_eq!(position(&state), (90.0, -180.0, 20));
    let (state, _) = comma("mapzen,10,10,0");
    assert_eq!(state.zoom, 1);
}

#[test]
fn trailing_tokens_become_flags() {
    let (state, _) = comma("mapzen,40.7,-74,16,mode=night,,custom=1");
    assert_eq!(state.flags(), ["mode=night", "custom=1"]);
    // Only the last token is consulted for the mode.
    assert_eq!(state.mode(), None);

    let (state, _) = comma("mapzen,40.7,-74,16,custom=1,mode=night");
    assert_eq!(state.mode(), Some("night"));
}

#[test]
fn canonical_fragments_round_trip() {
    for fragment in [
        "mapzen,40.7,-74,16",
        "mapzen,40.7,-74.0,16",
        "mapzen,40.70,-74.000,16,debug",
        "mapzen,51.508,-0.105,15",
        "mapzen,-33.8688,151.2093,12",
        "mapzen,40.7,-74,16,mode=night,custom=1",
    ] {
        assert_eq!(round_trip(fragment), fragment);
    }
}

#[test]
fn inactive_flags_are_not_reemitted() {
    let config = DemoConfig::default();
    let sync = HashSync::new(&config);
    let mut state = sync.parse("mapzen,40.7,-74,16,debug,custom=1").state;

    assert!(state.clear_flag("debug"));
    assert_eq!(sync.serialize(&state), "mapzen,40.7,-74,16,custom=1");
    state.set_mode("day");
    assert_eq!(sync.serialize(&state), "mapzen,40.7,-74,16,custom=1,mode=day");
}

#[test]
fn slash_format_reads_zoom_first() {
    let (state, issues) = slash("16/40.7/-74.0");
    assert_eq!(state.source_id, "mapzen");
    assert_eq!(position(&state), (40.7, -74.0, 16));
    assert!(issues.is_empty());
}

#[test]
fn slash_format_ignores_other_shapes() {
    for fragment in ["", "16/40.7", "16/40.7/-74/extra", "mapzen,London"] {
        let (state, issues) = slash(fragment);
        assert_eq!(position(&state), NEW_YORK, "{fragment}");
        assert!(issues.is_empty(), "{fragment}");
    }
    let (state, issues) = slash("x/40.7/-74");
    assert_eq!(position(&state), NEW_YORK);
    assert_eq!(issues.len(), 1);
}

#[test]
fn slash_format_writes_zoom_scaled_precision() {
    let config = DemoConfig::default();
    let sync = HashSync::with_format(&config, HashFormat::Slash);
    let state = sync.parse("16/40.7/-74.0").state;
    assert_eq!(sync.serialize(&state), "16/40.7000/-74.0000");

    let state = ViewState::new("mapzen", NamedLocation::new(51.50853, -0.12574, 2));
    assert_eq!(sync.serialize(&state), "2/51.5/-0.1");
}

#[test]
fn settled_view_is_published_to_target() {
    let config = DemoConfig::default();
    let sync = HashSync::new(&config);
    let mut state = sync.parse("mapzen,London").state;
    let mut written: Vec<String> = Vec::new();

    state.settle(51.51, -0.11, 16.0, &config);
    let fragment = sync.publish(&state, &mut written).unwrap();
    state.jump_to(config.locations.get("Seattle").unwrap(), &config);
    sync.publish(&state, &mut written).unwrap();

    assert_eq!(fragment, "mapzen,51.51,-0.11,16");
    assert_eq!(
        written,
        vec![
            "mapzen,51.51,-0.11,16".to_string(),
            "mapzen,47.609722,-122.333056,15".to_string(),
        ]
    );
}

#[test]
fn deployment_config_selects_format() {
    let mut config = DemoConfig::default();
    config.format = HashFormat::Slash;
    let json = serde_json::to_string(&config).unwrap();
    let loaded = DemoConfig::from_json(&json).unwrap();
    assert_eq!(HashSync::new(&loaded).format(), HashFormat::Slash);
}

#[test]
fn fragment_spelling_is_kept_only_while_position_is_unchanged() {
    assert_eq!(round_trip("40.70,-74.0,16"), "mapzen,40.70,-74.0,16");
    // Clamped or rounded values no longer match what was written.
    assert_eq!(round_trip("mapzen,95.0,-190.0,25"), "mapzen,90,-180,20");
    assert_eq!(round_trip("mapzen,40.7,-74.0,16.4"), "mapzen,40.7,-74,16");

    let config = DemoConfig::default();
    let sync = HashSync::new(&config);
    let mut state = sync.parse("mapzen,40.7,-74.0,16").state;
    state.settle(40.7, -74.0, 16.0, &config);
    assert_eq!(sync.serialize(&state), "mapzen,40.7,-74,16");
}
