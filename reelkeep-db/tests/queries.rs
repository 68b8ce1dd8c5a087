use reelkeep_catalog::*;
use reelkeep_db::{performer, query, scene, studio, tag, QueryError, SortConfig};
use rusqlite::Connection;

struct Library {
    conn: Connection,
    acme: i64,
    brix: i64,
    cinema: i64,
    jane: i64,
    john: i64,
    ann: i64,
    outdoor: i64,
    indoor: i64,
    scenes: [i64; 4],
}

/// Four scenes:
///
/// | path         | title       | rating | size  | studio | performers  | tags             |
/// |--------------|-------------|--------|-------|--------|-------------|------------------|
/// | /lib/a.mp4   | Beach Day   | 5      | 900   | Acme   | Jane, John  | outdoor          |
/// | /lib/b.mp4   | Office      | 3      | 10000 | Brix   | Jane        | indoor           |
/// | /lib/c.mp4   | -           | -      | -     | -      | -           | -                |
/// | /lib/d.mp4   | Beach Night | 4      | 50    | Acme   | Ann         | outdoor, indoor  |
fn library() -> Library {
    let mut conn = reelkeep_db::open_memory().unwrap();
    let tx = conn.transaction().unwrap();

    let acme = studio::create(&tx, &NewStudio::named("Acme")).unwrap().id;
    let brix = studio::create(&tx, &NewStudio::named("Brix")).unwrap().id;
    let cinema = studio::create(&tx, &NewStudio::named("Cinema")).unwrap().id;

    let mut jane = NewPerformer::named("Jane Doe");
    jane.favorite = true;
    jane.country = Some("US".into());
    let jane = performer::create(&tx, &jane).unwrap().id;
    let john = performer::create(&tx, &NewPerformer::named("John Roe"))
        .unwrap()
        .id;
    let ann = performer::create(&tx, &NewPerformer::named("Ann Lee"))
        .unwrap()
        .id;

    let outdoor = tag::create(&tx, &NewTag::named("outdoor")).unwrap().id;
    let indoor = tag::create(&tx, &NewTag::named("indoor")).unwrap().id;

    let new_scene = |path: &str, title: Option<&str>, rating, size: Option<&str>, studio_id| {
        let mut s = NewScene::from_path(path);
        s.title = title.map(String::from);
        s.rating = rating;
        s.size = size.map(String::from);
        s.studio_id = studio_id;
        scene::create(&tx, &s).unwrap().id
    };
    let a = new_scene("/lib/a.mp4", Some("Beach Day"), Some(5), Some("900"), Some(acme));
    let b = new_scene("/lib/b.mp4", Some("Office"), Some(3), Some("10000"), Some(brix));
    let c = new_scene("/lib/c.mp4", None, None, None, None);
    let d = new_scene("/lib/d.mp4", Some("Beach Night"), Some(4), Some("50"), Some(acme));

    for (s, p) in [(a, jane), (a, john), (b, jane), (d, ann)] {
        scene::add_performer(&tx, s, p).unwrap();
    }
    for (s, t) in [(a, outdoor), (b, indoor), (d, outdoor), (d, indoor)] {
        scene::add_tag(&tx, s, t).unwrap();
    }
    tx.commit().unwrap();

    Library {
        conn,
        acme,
        brix,
        cinema,
        jane,
        john,
        ann,
        outdoor,
        indoor,
        scenes: [a, b, c, d],
    }
}

fn config() -> SortConfig {
    SortConfig::with_seed(0.421_337)
}

fn scene_ids(lib: &Library, filter: Option<&SceneFilter>, find: Option<&FindFilter>) -> (i64, Vec<i64>) {
    let result = query::<Scene>(&lib.conn, &config(), filter, find).unwrap();
    (result.count, result.items.iter().map(|s| s.id).collect())
}

fn find_q(q: &str) -> FindFilter {
    FindFilter {
        q: Some(q.to_string()),
        ..Default::default()
    }
}

// ── Find ────────────────────────────────────────────────────────────────────

#[test]
fn default_find_returns_everything_in_path_order() {
    let lib = library();
    let [a, b, c, d] = lib.scenes;
    assert_eq!(scene_ids(&lib, None, None), (4, vec![a, b, c, d]));
}

#[test]
fn count_ignores_pagination() {
    let lib = library();
    let [_, _, c, d] = lib.scenes;
    let find = FindFilter {
        page: Some(2),
        per_page: Some(2),
        ..Default::default()
    };
    assert_eq!(scene_ids(&lib, None, Some(&find)), (4, vec![c, d]));

    let past_end = FindFilter {
        page: Some(9),
        per_page: Some(2),
        ..Default::default()
    };
    assert_eq!(scene_ids(&lib, None, Some(&past_end)), (4, vec![]));
}

#[test]
fn huge_page_number_returns_no_items() {
    let lib = library();
    let find = FindFilter {
        page: Some(i64::MAX),
        per_page: Some(25),
        ..Default::default()
    };
    assert_eq!(scene_ids(&lib, None, Some(&find)), (4, vec![]));

    let result = query::<Tag>(&lib.conn, &config(), None, Some(&find)).unwrap();
    assert_eq!(result.count, 2);
    assert!(result.items.is_empty());
}

#[test]
fn single_item_pages() {
    let lib = library();
    let find = FindFilter {
        per_page: Some(1),
        ..Default::default()
    };
    let result = query::<Performer>(&lib.conn, &config(), None, Some(&find)).unwrap();
    assert_eq!(result.count, 3);
    assert_eq!(result.items.len(), 1);
    assert_eq!(result.items[0].id, lib.ann);
}

// ── Search ──────────────────────────────────────────────────────────────────

#[test]
fn search_matches_any_word() {
    let lib = library();
    let [a, _, _, d] = lib.scenes;
    assert_eq!(scene_ids(&lib, None, Some(&find_q("beach"))), (2, vec![a, d]));
    assert_eq!(
        scene_ids(&lib, None, Some(&find_q("day night"))),
        (2, vec![a, d])
    );
}

#[test]
fn quoted_search_is_one_phrase() {
    let lib = library();
    let [a, _, _, _] = lib.scenes;
    assert_eq!(
        scene_ids(&lib, None, Some(&find_q("\"Beach Day\""))),
        (1, vec![a])
    );
    assert_eq!(
        scene_ids(&lib, None, Some(&find_q("\"Day Beach\""))),
        (0, vec![])
    );
}

#[test]
fn search_covers_paths() {
    let lib = library();
    let [_, _, c, _] = lib.scenes;
    assert_eq!(scene_ids(&lib, None, Some(&find_q("c.mp4"))), (1, vec![c]));
}

#[test]
fn blank_search_is_ignored() {
    let lib = library();
    assert_eq!(scene_ids(&lib, None, Some(&find_q("   "))).0, 4);
}

// ── Scene Filters ───────────────────────────────────────────────────────────

#[test]
fn rating_filter() {
    let lib = library();
    let [a, _, c, d] = lib.scenes;

    let filter = SceneFilter {
        rating: Some(IntCriterion::new(CriterionModifier::GreaterThan, 3)),
        ..Default::default()
    };
    assert_eq!(scene_ids(&lib, Some(&filter), None), (2, vec![a, d]));

    let filter = SceneFilter {
        rating: Some(IntCriterion::new(CriterionModifier::IsNull, 0)),
        ..Default::default()
    };
    assert_eq!(scene_ids(&lib, Some(&filter), None), (1, vec![c]));
}

#[test]
fn path_filter() {
    let lib = library();
    let [_, b, _, _] = lib.scenes;
    let filter = SceneFilter {
        path: Some(StringCriterion::new(CriterionModifier::Equals, "/lib/b.mp4")),
        ..Default::default()
    };
    assert_eq!(scene_ids(&lib, Some(&filter), None), (1, vec![b]));
}

#[test]
fn studio_filter_excludes_keep_unassigned_scenes() {
    let lib = library();
    let [a, b, c, d] = lib.scenes;

    let filter = SceneFilter {
        studios: Some(MultiCriterion::new(CriterionModifier::Includes, vec![lib.acme])),
        ..Default::default()
    };
    assert_eq!(scene_ids(&lib, Some(&filter), None), (2, vec![a, d]));

    let filter = SceneFilter {
        studios: Some(MultiCriterion::new(CriterionModifier::Excludes, vec![lib.acme])),
        ..Default::default()
    };
    assert_eq!(scene_ids(&lib, Some(&filter), None), (2, vec![b, c]));

    let filter = SceneFilter {
        studios: Some(MultiCriterion::new(
            CriterionModifier::Includes,
            vec![lib.acme, lib.brix],
        )),
        ..Default::default()
    };
    assert_eq!(scene_ids(&lib, Some(&filter), None), (3, vec![a, b, d]));
}

#[test]
fn tag_filter_drops_whole_scenes() {
    let lib = library();
    let [a, _, c, d] = lib.scenes;

    let filter = SceneFilter {
        tags: Some(MultiCriterion::new(CriterionModifier::Includes, vec![lib.outdoor])),
        ..Default::default()
    };
    assert_eq!(scene_ids(&lib, Some(&filter), None), (2, vec![a, d]));

    // d is tagged outdoor too, but it also carries indoor
    let filter = SceneFilter {
        tags: Some(MultiCriterion::new(CriterionModifier::Excludes, vec![lib.indoor])),
        ..Default::default()
    };
    assert_eq!(scene_ids(&lib, Some(&filter), None), (2, vec![a, c]));
}

#[test]
fn performer_filter() {
    let lib = library();
    let [a, b, _, d] = lib.scenes;

    let filter = SceneFilter {
        performers: Some(MultiCriterion::new(CriterionModifier::Includes, vec![lib.jane])),
        ..Default::default()
    };
    assert_eq!(scene_ids(&lib, Some(&filter), None), (2, vec![a, b]));

    let filter = SceneFilter {
        performers: Some(MultiCriterion::new(
            CriterionModifier::Includes,
            vec![lib.john, lib.ann],
        )),
        ..Default::default()
    };
    assert_eq!(scene_ids(&lib, Some(&filter), None), (2, vec![a, d]));
}

#[test]
fn performer_count_filter_uses_having() {
    let lib = library();
    let [a, _, c, _] = lib.scenes;

    let filter = SceneFilter {
        performer_count: Some(IntCriterion::new(CriterionModifier::GreaterThan, 1)),
        ..Default::default()
    };
    assert_eq!(scene_ids(&lib, Some(&filter), None), (1, vec![a]));

    let filter = SceneFilter {
        performer_count: Some(IntCriterion::new(CriterionModifier::Equals, 0)),
        ..Default::default()
    };
    assert_eq!(scene_ids(&lib, Some(&filter), None), (1, vec![c]));
}

#[test]
fn search_and_having_bind_in_order() {
    let lib = library();
    let [a, _, _, d] = lib.scenes;
    let filter = SceneFilter {
        performer_count: Some(IntCriterion::new(CriterionModifier::Equals, 1)),
        ..Default::default()
    };
    assert_eq!(
        scene_ids(&lib, Some(&filter), Some(&find_q("beach"))),
        (1, vec![d])
    );

    let filter = SceneFilter {
        performer_count: Some(IntCriterion::new(CriterionModifier::GreaterThan, 0)),
        ..Default::default()
    };
    assert_eq!(
        scene_ids(&lib, Some(&filter), Some(&find_q("beach"))),
        (2, vec![a, d])
    );
}

#[test]
fn missing_fields() {
    let lib = library();
    let [_, _, c, _] = lib.scenes;
    for field in [
        MissingField::Title,
        MissingField::Studio,
        MissingField::Performers,
        MissingField::Tags,
    ] {
        let filter = SceneFilter {
            is_missing: Some(field),
            ..Default::default()
        };
        assert_eq!(scene_ids(&lib, Some(&filter), None), (1, vec![c]), "{field:?}");
    }

    let filter = SceneFilter {
        is_missing: Some(MissingField::Url),
        ..Default::default()
    };
    assert_eq!(scene_ids(&lib, Some(&filter), None).0, 4);
}

#[test]
fn set_modifier_on_scalar_is_rejected() {
    let lib = library();
    let filter = SceneFilter {
        rating: Some(IntCriterion::new(CriterionModifier::Includes, 3)),
        ..Default::default()
    };
    let err = query::<Scene>(&lib.conn, &config(), Some(&filter), None).unwrap_err();
    assert!(matches!(err, QueryError::InvalidCriterion(_)));
}

// ── Other Entities ──────────────────────────────────────────────────────────

#[test]
fn studio_scene_count() {
    let lib = library();
    let studio_ids = |filter: &StudioFilter| {
        let result = query::<Studio>(&lib.conn, &config(), Some(filter), None).unwrap();
        (result.count, result.items.iter().map(|s| s.id).collect::<Vec<_>>())
    };

    let filter = StudioFilter {
        scene_count: Some(IntCriterion::new(CriterionModifier::GreaterThan, 1)),
    };
    assert_eq!(studio_ids(&filter), (1, vec![lib.acme]));

    let filter = StudioFilter {
        scene_count: Some(IntCriterion::new(CriterionModifier::Equals, 0)),
    };
    assert_eq!(studio_ids(&filter), (1, vec![lib.cinema]));
}

#[test]
fn performer_filters() {
    let lib = library();
    let performer_ids = |filter: &PerformerFilter| {
        let result = query::<Performer>(&lib.conn, &config(), Some(filter), None).unwrap();
        result.items.iter().map(|p| p.id).collect::<Vec<_>>()
    };

    let favorites = PerformerFilter {
        favorite: Some(true),
        ..Default::default()
    };
    assert_eq!(performer_ids(&favorites), vec![lib.jane]);

    let not_favorites = PerformerFilter {
        favorite: Some(false),
        ..Default::default()
    };
    assert_eq!(performer_ids(&not_favorites), vec![lib.ann, lib.john]);

    let by_country = PerformerFilter {
        country: Some(StringCriterion::new(CriterionModifier::Equals, "US")),
        ..Default::default()
    };
    assert_eq!(performer_ids(&by_country), vec![lib.jane]);

    let busy = PerformerFilter {
        scene_count: Some(IntCriterion::new(CriterionModifier::GreaterThan, 1)),
        ..Default::default()
    };
    assert_eq!(performer_ids(&busy), vec![lib.jane]);
}

#[test]
fn tags_search_and_sort_by_name() {
    let lib = library();
    let result = query::<Tag>(&lib.conn, &config(), None, None).unwrap();
    assert_eq!(
        result.items.iter().map(|t| t.id).collect::<Vec<_>>(),
        vec![lib.indoor, lib.outdoor]
    );

    let result = query::<Tag>(&lib.conn, &config(), None, Some(&find_q("out"))).unwrap();
    assert_eq!(result.count, 1);
    assert_eq!(result.items[0].name, "outdoor");
}

#[test]
fn tag_scene_count() {
    let lib = library();
    let filter = TagFilter {
        scene_count: Some(IntCriterion::new(CriterionModifier::Equals, 2)),
    };
    let result = query::<Tag>(&lib.conn, &config(), Some(&filter), None).unwrap();
    assert_eq!(result.count, 2);
}

// ── Sort ────────────────────────────────────────────────────────────────────

fn sorted(sort: &str, direction: &str) -> FindFilter {
    FindFilter {
        sort: Some(sort.to_string()),
        direction: Some(direction.to_string()),
        ..Default::default()
    }
}

#[test]
fn sort_by_column_descending() {
    let lib = library();
    let [a, b, c, d] = lib.scenes;
    assert_eq!(
        scene_ids(&lib, None, Some(&sorted("rating", "DESC"))).1,
        vec![a, d, b, c]
    );
}

#[test]
fn filesize_sorts_numerically() {
    let lib = library();
    let [a, b, c, d] = lib.scenes;
    assert_eq!(
        scene_ids(&lib, None, Some(&sorted("filesize", "ASC"))).1,
        vec![c, d, a, b]
    );
}

#[test]
fn sort_by_relation_count() {
    let lib = library();
    let find = sorted("scenes_count", "DESC");
    let result = query::<Performer>(&lib.conn, &config(), None, Some(&find)).unwrap();
    assert_eq!(result.items[0].id, lib.jane);

    let result = query::<Studio>(&lib.conn, &config(), None, Some(&find)).unwrap();
    assert_eq!(result.items[0].id, lib.acme);
    assert_eq!(result.items[2].id, lib.cinema);
}

#[test]
fn name_sort_ignores_case() {
    let mut lib = library();
    let tx = lib.conn.transaction().unwrap();
    let lower = studio::create(&tx, &NewStudio::named("bolt")).unwrap().id;
    tx.commit().unwrap();

    let result = query::<Studio>(&lib.conn, &config(), None, None).unwrap();
    assert_eq!(
        result.items.iter().map(|s| s.id).collect::<Vec<_>>(),
        vec![lib.acme, lower, lib.brix, lib.cinema]
    );
}

#[test]
fn random_sort_is_stable_for_a_seed() {
    let lib = library();
    let page = |n| FindFilter {
        sort: Some("random".into()),
        page: Some(n),
        per_page: Some(2),
        ..Default::default()
    };

    let first = scene_ids(&lib, None, Some(&page(1))).1;
    assert_eq!(scene_ids(&lib, None, Some(&page(1))).1, first);

    let mut all = first;
    all.extend(scene_ids(&lib, None, Some(&page(2))).1);
    all.sort();
    let mut expected = lib.scenes.to_vec();
    expected.sort();
    assert_eq!(all, expected);
}

#[test]
fn malformed_sort_key_is_rejected() {
    let lib = library();
    let find = sorted("path; DROP TABLE scenes", "ASC");
    let err = query::<Scene>(&lib.conn, &config(), None, Some(&find)).unwrap_err();
    assert!(matches!(err, QueryError::InvalidSort(_)));
}
