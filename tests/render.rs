use std::fs;
use std::path::{Path, PathBuf};

use papertape::{
    Configuration, Font8x8Basic, LogicalTape, Manifest, Margins, PreviewOptions, Side,
    TapeOptions, render_tape, save_preview,
};
use pretty_assertions::assert_eq;

fn configure(options: TapeOptions) -> Configuration {
    Configuration::resolve(&options).unwrap()
}

fn bare(options: TapeOptions) -> TapeOptions {
    TapeOptions {
        lead_in: 0,
        lead_out: 0,
        ..options
    }
}

fn letter() -> TapeOptions {
    bare(TapeOptions {
        page_size: "Letter".into(),
        ..TapeOptions::default()
    })
}

fn read(path: &Path) -> String {
    fs::read_to_string(path).unwrap()
}

fn count(haystack: &str, needle: &str) -> usize {
    haystack.matches(needle).count()
}

#[test]
fn tape_page_holds_every_row() {
    let dir = tempfile::tempdir().unwrap();
    let out = dir.path().join("out.svg");
    let config = configure(TapeOptions::default());

    let report = render_tape(&config, b"HELLO", &out).unwrap();

    assert_eq!(report.total_rows, 25);
    assert_eq!(report.sides.len(), 1);
    let front = &report.sides[0];
    assert_eq!(front.side, Side::Front);
    assert_eq!(front.pages, vec![out.clone()]);
    assert_eq!(front.columns, 1);

    let svg = read(&out);
    assert!(svg.contains(r#"width="1in""#));
    assert!(svg.contains(r#"height="2.5in""#));
    assert!(svg.contains(r#"viewBox="0 0 1 2.5""#));
    // eight data positions and the feed hole on every row
    assert_eq!(count(&svg, "<circle"), 25 * 9);
    assert!(svg.contains("<!-- 0x48 - 0b01001000 -->"));
    assert!(!svg.contains("scale(1 -1)"));
}

#[test]
fn title_adds_eight_rows_per_character() {
    let dir = tempfile::tempdir().unwrap();
    let out = dir.path().join("titled.svg");
    let config = configure(TapeOptions {
        title: "HI".into(),
        ..TapeOptions::default()
    });

    let report = render_tape(&config, &[1, 2, 3], &out).unwrap();

    assert_eq!(report.title_rows, 16);
    assert_eq!(report.total_rows, 10 + 16 + 3 + 10);
    assert_eq!(report.sides[0].rows, report.total_rows);
    let svg = read(&out);
    assert!(svg.contains("title starts at row 10"));
    assert!(svg.contains("data starts at row 26"));
    assert!(svg.contains("lead-out starts at row 29"));
}

#[test]
fn only_holes_skips_unpunched_positions() {
    let dir = tempfile::tempdir().unwrap();
    let out = dir.path().join("holes.svg");
    let config = configure(bare(TapeOptions {
        only_render_holes: true,
        ..TapeOptions::default()
    }));

    render_tape(&config, &[0xFF, 0x00], &out).unwrap();

    assert_eq!(count(&read(&out), "<circle"), 9 + 1);
}

#[test]
fn letter_columns_fill_a_page_exactly() {
    let dir = tempfile::tempdir().unwrap();
    let out = dir.path().join("letter.svg");
    let config = configure(letter());
    // 100 rows per column, six 1in columns with 0.25in gaps per page
    assert_eq!(config.columns_per_page(), 6);

    let report = render_tape(&config, &vec![0u8; 600], &out).unwrap();
    let front = &report.sides[0];
    assert_eq!(front.columns, 6);
    assert_eq!(front.pages, vec![out.clone()]);
    assert_eq!(count(&read(&out), "<clipPath"), 6);
}

#[test]
fn one_more_row_spills_onto_a_new_page() {
    let dir = tempfile::tempdir().unwrap();
    let out = dir.path().join("letter.svg");
    let config = configure(letter());

    let report = render_tape(&config, &vec![0u8; 601], &out).unwrap();
    let front = &report.sides[0];
    assert_eq!(front.columns, 7);
    assert_eq!(front.pages, vec![out.clone(), dir.path().join("letter.1.svg")]);

    let second = read(&front.pages[1]);
    assert!(second.contains(r#"height="11in""#));
    assert_eq!(count(&second, "<clipPath"), 1);
    assert_eq!(count(&second, "<circle"), 9);
    // the last column is only as tall as the rows it holds
    assert!(second.contains(r#"height="0.1""#));
}

#[test]
fn page_count_follows_columns_that_fit_between_margins() {
    let dir = tempfile::tempdir().unwrap();
    let out = dir.path().join("long.svg");
    let config = configure(letter());

    let report = render_tape(&config, &vec![0u8; 1300], &out).unwrap();

    // thirteen columns at six per page
    let front = &report.sides[0];
    assert_eq!(front.columns, 13);
    assert_eq!(front.pages.len(), 3);
    let last = read(&front.pages[2]);
    assert_eq!(count(&last, "<clipPath"), 1);
    assert_eq!(count(&last, "<circle"), 100 * 9);
}

#[test]
fn reverse_pages_mirror_the_front() {
    let dir = tempfile::tempdir().unwrap();
    let out = dir.path().join("tape.svg");
    let config = configure(TapeOptions {
        reverse: true,
        ..letter()
    });

    let report = render_tape(&config, &vec![0x5Au8; 700], &out).unwrap();
    let [front, back] = report.sides.as_slice() else {
        panic!("expected two sides, got {}", report.sides.len());
    };
    assert_eq!(back.side, Side::Back);
    assert_eq!(front.pages.len(), back.pages.len());
    let names: Vec<PathBuf> = back.pages.clone();
    assert_eq!(
        names,
        vec![
            dir.path().join("tape.reverse.svg"),
            dir.path().join("tape.1.reverse.svg"),
        ]
    );
    for (f, b) in front.pages.iter().zip(&back.pages) {
        let (f, b) = (read(f), read(b));
        assert!(!f.contains("scale(1 -1)"));
        assert!(b.contains(r#"transform="translate(0 11) scale(1 -1)""#));
        assert_eq!(count(&f, "<circle"), count(&b, "<circle"));
    }
}

#[test]
fn empty_tape_still_gets_one_page_per_side() {
    for page_size in ["Tape", "Letter"] {
        let dir = tempfile::tempdir().unwrap();
        let out = dir.path().join("empty.svg");
        let config = configure(bare(TapeOptions {
            page_size: page_size.into(),
            reverse: true,
            ..TapeOptions::default()
        }));

        let report = render_tape(&config, &[], &out).unwrap();

        assert_eq!(report.total_rows, 0);
        for side in &report.sides {
            assert_eq!(side.pages.len(), 1, "{page_size} {:?}", side.side);
            let svg = read(&side.pages[0]);
            assert_eq!(count(&svg, "<circle"), 0);
            assert!(svg.trim_end().ends_with("</svg>"));
        }
    }
}

#[test]
fn fan_fold_caps_column_height() {
    let dir = tempfile::tempdir().unwrap();
    let out = dir.path().join("fold.svg");
    let config = configure(TapeOptions {
        fan_fold: 5.0,
        ..letter()
    });

    let report = render_tape(&config, &vec![0u8; 120], &out).unwrap();

    assert_eq!(report.sides[0].columns, 3);
    let svg = read(&out);
    assert!(svg.contains(r#"height="5""#));
    assert!(svg.contains(r#"height="2""#));
}

#[test]
fn feed_arrows_every_ten_inches() {
    let dir = tempfile::tempdir().unwrap();
    let out = dir.path().join("arrows.svg");
    let config = configure(bare(TapeOptions {
        dec_arrows: true,
        ..TapeOptions::default()
    }));

    render_tape(&config, &vec![0u8; 250], &out).unwrap();

    let svg = read(&out);
    assert!(svg.contains(">10 IN<"));
    assert!(svg.contains(">ROW 200<"));
    assert!(!svg.contains("ROW 300"));
}

#[test]
fn feed_arrows_follow_the_tape_across_columns() {
    let dir = tempfile::tempdir().unwrap();
    let out = dir.path().join("arrows.svg");
    // 95 rows per column, so arrows fall part way down later columns
    let config = configure(TapeOptions {
        dec_arrows: true,
        margins: Margins {
            top: 1.0,
            ..Margins::default()
        },
        ..letter()
    });
    assert_eq!(config.rows_per_column(380), 95);

    let report = render_tape(&config, &vec![0u8; 380], &out).unwrap();
    assert_eq!(report.sides[0].columns, 4);

    let svg = read(&out);
    let label = |text: &str| {
        let needle = format!(">{text}<");
        assert_eq!(count(&svg, &needle), 1, "{text}");
        svg.lines()
            .find(|line| line.contains(&needle))
            .unwrap()
            .trim()
            .to_string()
    };
    // column 1 starts at row 95: row 100 sits 0.5in below the top margin
    assert!(label("ROW 100").starts_with(r#"<text x="6.3" y="1.85""#));
    // column 2 starts at row 190
    assert!(label("ROW 200").starts_with(r#"<text x="5.05" y="2.35""#));
    // column 3 starts at row 285
    assert!(label("ROW 300").starts_with(r#"<text x="3.8" y="2.85""#));
}

#[test]
fn cut_marks_on_every_page() {
    let dir = tempfile::tempdir().unwrap();
    let out = dir.path().join("marks.svg");
    let config = configure(TapeOptions {
        cut_marks: true,
        ..letter()
    });

    let report = render_tape(&config, &vec![0u8; 601], &out).unwrap();

    for page in &report.sides[0].pages {
        assert_eq!(count(&read(page), "<line"), 8);
    }
}

#[test]
fn manifest_lists_pages_and_digest() {
    let dir = tempfile::tempdir().unwrap();
    let out = dir.path().join("run.svg");
    let config = configure(TapeOptions {
        reverse: true,
        ..TapeOptions::default()
    });
    let data = b"abc";
    let report = render_tape(&config, data, &out).unwrap();

    let path = dir.path().join("run.json");
    Manifest::new(&config, None, data, report.total_rows, report.title_rows, report.sides)
        .save(&path)
        .unwrap();

    let json: serde_json::Value = serde_json::from_str(&read(&path)).unwrap();
    assert_eq!(
        json["input_sha256"],
        "ba7816bf8f01cfea414140de5dae2223b00361a396177a9cb410ff61f20015ad"
    );
    assert_eq!(json["total_rows"], 23);
    assert_eq!(json["sides"][1]["side"], "back");
    assert_eq!(json["sides"][1]["pages"].as_array().unwrap().len(), 1);
}

#[test]
fn preview_strip_matches_tape_size() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("strip.png");
    let config = configure(TapeOptions::default());
    let tape = LogicalTape::from_config(&config, &Font8x8Basic, b"HELLO");

    save_preview(&config, &tape, &PreviewOptions::default(), &path).unwrap();

    let strip = image::open(&path).unwrap();
    // 25 rows at 150 dpi by a one inch tape
    assert_eq!((strip.width(), strip.height()), (375, 150));
}
