use reelkeep_catalog::name_matcher::{MatchError, NameMatcher, NamePatternSet, path_matches_name};

const NAME: &str = "Foo's Bar";
const SEPARATORS: [&str; 4] = [".", "-", "_", " "];

/// Path shapes where `name` sits in a token position.
fn true_paths(name: &str, sep: &str) -> Vec<String> {
    vec![
        format!("{name}{sep}aaa.mp4"),
        format!("aaa{sep}{name}.mp4"),
        format!("aaa{sep}{name}{sep}bbb.mp4"),
        format!("dir/{name}{sep}aaa.mp4"),
        format!("dir\\{name}{sep}aaa.mp4"),
        format!("{name}{sep}aaa/dir/bbb.mp4"),
        format!("{name}{sep}aaa\\dir\\bbb.mp4"),
        format!("dir/{name}{sep}/aaa.mp4"),
        format!("dir\\{name}{sep}\\aaa.mp4"),
    ]
}

#[test]
fn matches_every_separator_and_position() {
    let m = NameMatcher::new(NAME).unwrap();
    for sep in SEPARATORS {
        let joined = NAME.replace(' ', sep);
        for name in [NAME.to_string(), NAME.to_lowercase(), joined] {
            for path in true_paths(&name, sep) {
                assert!(m.matches(&path), "expected '{path}' to match");
            }
        }
    }
}

#[test]
fn rejects_split_name() {
    let m = NameMatcher::new(NAME).unwrap();
    for sep in SEPARATORS {
        let path = format!("Foo's{sep}aaa{sep}Bar.mp4");
        assert!(!m.matches(&path), "expected '{path}' not to match");
    }
}

#[test]
fn separator_example_from_docs() {
    assert!(path_matches_name(NAME, "aaa-Foo's-Bar-bbb.mp4"));
    assert!(!path_matches_name(NAME, "Foo's-aaa-Bar.mp4"));
}

#[test]
fn case_insensitive() {
    assert!(path_matches_name(NAME, "foo's bar.aaa.mp4"));
    assert!(path_matches_name(NAME, "FOO'S_BAR.mp4"));
}

#[test]
fn directory_segments() {
    assert!(path_matches_name(NAME, "dir/Foo's.Bar/aaa.mp4"));
    assert!(path_matches_name(NAME, "dir\\Foo's_Bar\\aaa.mp4"));
}

#[test]
fn rejects_substring_of_longer_word() {
    assert!(!path_matches_name("Bar", "Barbara.mp4"));
    assert!(!path_matches_name("Bar", "crowbar.mp4"));
    assert!(path_matches_name("Bar", "crow.bar.mp4"));
}

#[test]
fn whole_path_is_the_name() {
    assert!(path_matches_name("Bar", "Bar"));
}

#[test]
fn regex_metacharacters_are_literal() {
    assert!(path_matches_name("A+B (2020)", "x.A+B (2020).mp4"));
    assert!(!path_matches_name("A+B", "x.AAB.mp4"));
}

#[test]
fn empty_name_is_rejected() {
    assert!(matches!(NameMatcher::new("  "), Err(MatchError::EmptyName)));
    assert!(!path_matches_name("", "anything.mp4"));
}

#[test]
fn pattern_set_variants() {
    let set = NamePatternSet::new(NAME);
    let variants = set.variants();
    assert_eq!(variants[0], "Foo's Bar");
    assert!(variants.contains(&"foo's bar".to_string()));
    assert!(variants.contains(&"Foo's.Bar".to_string()));
    assert!(variants.contains(&"Foo's-Bar".to_string()));
    assert!(variants.contains(&"Foo's_Bar".to_string()));
    // the space separator reproduces the original, so it is deduplicated
    assert_eq!(variants.len(), 5);
}

#[test]
fn matcher_keeps_its_pattern_set() {
    let m = NameMatcher::new("  Foo's Bar ").unwrap();
    assert_eq!(m.name(), NAME);
    assert_eq!(m.patterns(), &NamePatternSet::new(NAME));
}

#[test]
fn single_word_pattern_set() {
    let set = NamePatternSet::new("tag");
    assert_eq!(set.variants(), &["tag".to_string()]);
}
