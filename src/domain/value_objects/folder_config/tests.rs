use super::*;

fn config(qualifiers: &str) -> FolderConfiguration {
    FolderConfiguration::from_qualifier_str(qualifiers).unwrap()
}

#[test]
fn empty_qualifiers_are_default() {
    let c = config("");
    assert!(c.is_default());
    assert_eq!(c.qualifier_string(), "");
    assert_eq!(c.to_string(), "default");
}

#[test]
fn parses_language_and_region() {
    let c = config("en-rUS");
    assert_eq!(c.locale, Some(Locale::new("en", Some("US"))));
    assert_eq!(c.qualifier_string(), "en-rUS");
}

#[test]
fn parses_bcp47_locale() {
    let c = config("b+kok+IN");
    let locale = c.locale.unwrap();
    assert_eq!(locale.language, "kok");
    assert_eq!(locale.region.as_deref(), Some("IN"));
    assert!(locale.bcp47);
    assert_eq!(locale.to_string(), "b+kok+IN");
}

#[test]
fn parses_bcp47_script() {
    let c = config("b+sr+latn+RS");
    let locale = c.locale.unwrap();
    assert_eq!(locale.script.as_deref(), Some("Latn"));
    assert_eq!(locale.region.as_deref(), Some("RS"));
}

#[test]
fn parses_full_canonical_chain() {
    let c = config("fr-rCA-ldrtl-sw600dp-w720dp-h400dp-large-land-television-night-xhdpi-v21");
    assert_eq!(c.layout_direction, Some(LayoutDirection::Rtl));
    assert_eq!(c.smallest_width, Some(600));
    assert_eq!(c.screen_width, Some(720));
    assert_eq!(c.screen_height, Some(400));
    assert_eq!(c.screen_size, Some(ScreenSize::Large));
    assert_eq!(c.orientation, Some(Orientation::Landscape));
    assert_eq!(c.ui_mode, Some(UiMode::Television));
    assert_eq!(c.night_mode, Some(NightMode::Night));
    assert_eq!(c.density, Some(Density::XHIGH));
    assert_eq!(c.version, Some(21));
    assert_eq!(
        c.qualifier_string(),
        "fr-rCA-ldrtl-sw600dp-w720dp-h400dp-large-land-television-night-xhdpi-v21"
    );
}

#[test]
fn parses_custom_and_special_densities() {
    assert_eq!(config("280dpi").density, Some(Density::Dpi(280)));
    assert_eq!(config("nodpi").density, Some(Density::NoDpi));
    assert_eq!(config("anydpi").density, Some(Density::AnyDpi));
    assert_eq!(config("hdpi").qualifier_string(), "hdpi");
}

#[test]
fn rejects_out_of_order_qualifiers() {
    assert!(FolderConfiguration::from_qualifier_str("hdpi-land").is_none());
    assert!(FolderConfiguration::from_qualifier_str("v21-en").is_none());
}

#[test]
fn rejects_unknown_qualifiers() {
    assert!(FolderConfiguration::from_qualifier_str("foo").is_none());
    assert!(FolderConfiguration::from_qualifier_str("EN").is_none());
    assert!(FolderConfiguration::from_qualifier_str("en-rus").is_none());
    assert!(FolderConfiguration::from_qualifier_str("b+").is_none());
}

#[test]
fn folder_name_renders_type_and_qualifiers() {
    assert_eq!(config("en").folder_name("values"), "values-en");
    assert_eq!(config("").folder_name("values"), "values");
    assert_eq!(
        FolderConfiguration::from_folder_name("drawable-port-hdpi").unwrap(),
        config("port-hdpi")
    );
}

#[test]
fn region_specific_folder_does_not_match_bare_language() {
    assert!(config("en").is_match_for(&config("en-rUS")));
    assert!(!config("en-rUS").is_match_for(&config("en")));
    assert!(!config("fr").is_match_for(&config("en-rUS")));
}

#[test]
fn unspecified_reference_facets_match_anything() {
    assert!(config("land").is_match_for(&config("en")));
    assert!(config("sw600dp").is_match_for(&FolderConfiguration::default()));
}

#[test]
fn numeric_facets_require_enough_room() {
    assert!(config("sw600dp").is_match_for(&config("sw720dp")));
    assert!(!config("sw720dp").is_match_for(&config("sw600dp")));
    assert!(!config("v21").is_match_for(&config("v19")));
}

#[test]
fn best_match_prefers_most_specific_locale() {
    let candidates = [config(""), config("en"), config("en-rGB"), config("en-rUS")];
    let best = FolderConfiguration::find_best_match(&candidates, &config("en-rUS"));
    assert_eq!(best, Some(3));

    let best = FolderConfiguration::find_best_match(&candidates, &config("en-rAU"));
    assert_eq!(best, Some(1));

    let best = FolderConfiguration::find_best_match(&candidates, &config("de"));
    assert_eq!(best, Some(0));
}

#[test]
fn best_match_uses_orientation() {
    let candidates = [config(""), config("land"), config("port")];
    assert_eq!(
        FolderConfiguration::find_best_match(&candidates, &config("port")),
        Some(2)
    );
}

#[test]
fn best_match_picks_closest_density() {
    let candidates = [config("mdpi"), config("xhdpi"), config("xxhdpi")];
    assert_eq!(
        FolderConfiguration::find_best_match(&candidates, &config("hdpi")),
        Some(1)
    );
    assert_eq!(
        FolderConfiguration::find_best_match(&candidates, &config("xxxhdpi")),
        Some(2)
    );
}

#[test]
fn best_match_picks_largest_smallest_width() {
    let candidates = [config(""), config("sw320dp"), config("sw600dp"), config("sw720dp")];
    assert_eq!(
        FolderConfiguration::find_best_match(&candidates, &config("sw700dp")),
        Some(2)
    );
}

#[test]
fn best_match_prefers_generic_folders_for_open_facets() {
    let candidates = [config("fr-rCA"), config("land"), config(""), config("fr")];
    assert_eq!(
        FolderConfiguration::find_best_match(&candidates, &config("")),
        Some(2)
    );
    assert_eq!(config("fr-rCA-land-v21").facet_count(), 3);
}

#[test]
fn best_match_none_when_nothing_compatible() {
    let candidates = [config("fr"), config("de")];
    assert_eq!(
        FolderConfiguration::find_best_match(&candidates, &config("en")),
        None
    );
}
