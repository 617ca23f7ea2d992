// End-to-end tests over the public API: join -> rate -> colors -> image file.

use chrono::NaiveDate;
use geo::{MultiPolygon, polygon};

use covidmap::{
    CaseRecord, CaseTable, Dataset, DateCheck, DateRange, Fill, Gradient, MunicipalityShape, Pipeline, RateMode,
    config::RenderConfig,
    join::join,
};

fn ymd(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

fn square(x: f64, y: f64) -> MultiPolygon<f64> {
    MultiPolygon(vec![polygon![(x: x, y: y), (x: x + 1.0, y: y), (x: x + 1.0, y: y + 1.0), (x: x, y: y + 1.0)]])
}

fn dataset() -> Dataset {
    let shapes = vec![
        MunicipalityShape::new("Amsterdam", 800_000, square(0.0, 0.0)),
        MunicipalityShape::new("Utrecht", 350_000, square(1.0, 0.0)),
        MunicipalityShape::new("Vlieland", 1_100, square(0.0, 1.0)),
        MunicipalityShape::new("Almere", 200_000, square(1.0, 1.0)),
    ];
    let cases = CaseTable::from_records(vec![
        CaseRecord::new(ymd(2020, 3, 1), "Amsterdam", 12),
        CaseRecord::new(ymd(2020, 3, 1), "Utrecht", 7),
        CaseRecord::new(ymd(2020, 3, 1), "Almere", 3),
        CaseRecord::new(ymd(2020, 3, 1), "Atlantis", 99),
        CaseRecord::new(ymd(2020, 3, 2), "Amsterdam", 20),
        CaseRecord::new(ymd(2020, 3, 2), "Vlieland", 1),
    ]);
    Dataset::new(shapes, cases).unwrap()
}

#[test]
fn left_join_example() {
    let d = ymd(2020, 5, 1);
    let shapes = vec![
        MunicipalityShape::new("A", 100, square(0.0, 0.0)),
        MunicipalityShape::new("B", 200, square(1.0, 0.0)),
    ];
    let cases = vec![CaseRecord::new(d, "A", 50)];
    let joined = join(&shapes, &cases, d, RateMode::Exact);

    assert_eq!(joined.len(), 2);
    assert_eq!(joined[0].name, "A");
    assert_eq!(joined[0].rate, Some(50_000.0));
    assert_eq!(joined[1].name, "B");
    assert_eq!(joined[1].rate, None);
}

#[test]
fn date_guard_bounds() {
    let range = DateRange::new(ymd(2020, 1, 1), ymd(2020, 1, 31)).unwrap();
    assert_eq!(range.check(ymd(2020, 1, 15)), DateCheck::Valid);
    assert_eq!(range.check(ymd(2019, 12, 31)), DateCheck::OutOfRange);
    assert_eq!(range.check(ymd(2020, 1, 1)), DateCheck::Valid);
    assert_eq!(range.check(ymd(2020, 1, 31)), DateCheck::Valid);
}

#[test]
fn missing_municipality_is_grey_and_others_span_the_gradient() {
    let dataset = dataset();
    let config = RenderConfig::default();
    let map = Pipeline::new(&dataset, &config).build(ymd(2020, 3, 1), Gradient::Viridis).unwrap();

    assert_eq!(map.features.len(), 4);
    assert_eq!(map.missing_count(), 1);
    assert_eq!(map.features[2].name, "Vlieland");
    assert_eq!(map.features[2].fill, Fill::Missing(config.missing_color));

    // Amsterdam 1.5, Utrecht 2.0, Almere 1.5 per 100k
    let fills = map.fills();
    assert_eq!(fills[0], Gradient::Viridis.at(0.0));
    assert_eq!(fills[1], Gradient::Viridis.at(1.0));
    assert_eq!(fills[3], fills[0]);
}

#[test]
fn rendering_twice_assigns_same_colors() {
    let dataset = dataset();
    let dir = tempfile::tempdir().unwrap();
    let config = RenderConfig { output: dir.path().join("map.svg"), ..RenderConfig::default() };
    let pipeline = Pipeline::new(&dataset, &config);

    let first = pipeline.render(ymd(2020, 3, 2), "inferno").unwrap();
    let first_svg = std::fs::read_to_string(&config.output).unwrap();
    let second = pipeline.render(ymd(2020, 3, 2), "Inferno").unwrap();
    let second_svg = std::fs::read_to_string(&config.output).unwrap();

    assert_eq!(first.fills(), second.fills());
    assert_eq!(first_svg, second_svg);
}

#[test]
fn svg_output_has_one_path_per_municipality() {
    let dataset = dataset();
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("out").join("map.svg");
    let config = RenderConfig::default();

    let map = Pipeline::new(&dataset, &config).render_to(ymd(2020, 3, 1), Gradient::Reds, &path).unwrap();
    let svg = std::fs::read_to_string(&path).unwrap();

    assert_eq!(svg.matches("<path ").count(), 4);
    assert!(svg.contains(&config.missing_color.hex()));
    assert!(svg.contains(&map.title));
}

const PNG_SIGNATURE: &[u8] = b"\x89PNG\r\n\x1a\n";

#[test]
fn png_output_regardless_of_extension() {
    let dataset = dataset();
    let dir = tempfile::tempdir().unwrap();
    let config = RenderConfig::default();
    let pipeline = Pipeline::new(&dataset, &config);

    for name in ["map.png", "map", "map.out", "map.jpg"] {
        let path = dir.path().join(name);
        pipeline.render_to(ymd(2020, 3, 1), Gradient::Viridis, &path).unwrap();
        let bytes = std::fs::read(&path).unwrap();
        assert!(bytes.starts_with(PNG_SIGNATURE), "{name} is not a PNG");
    }
    // only the four outputs, no temp files
    assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 4);
}

#[test]
fn out_of_range_date_renders_placeholder() {
    let dataset = dataset();
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("map.svg");
    let config = RenderConfig::default();

    let map = Pipeline::new(&dataset, &config).render_to(ymd(2021, 1, 1), Gradient::Viridis, &path).unwrap();
    assert_eq!(map.title, "Select a date between 2020-03-01 and 2020-03-02");
    assert_eq!(map.fills(), vec![config.placeholder_color; 4]);

    let svg = std::fs::read_to_string(&path).unwrap();
    assert!(svg.contains("Select a date between 2020-03-01 and 2020-03-02"));
}

#[test]
fn failed_render_keeps_previous_output() {
    let dataset = dataset();
    let dir = tempfile::tempdir().unwrap();
    let config = RenderConfig { output: dir.path().join("map.svg"), ..RenderConfig::default() };
    let pipeline = Pipeline::new(&dataset, &config);

    pipeline.render(ymd(2020, 3, 1), "viridis").unwrap();
    let before = std::fs::read_to_string(&config.output).unwrap();

    assert!(pipeline.render(ymd(2020, 3, 2), "no-such-gradient").is_err());
    assert_eq!(std::fs::read_to_string(&config.output).unwrap(), before);
}

#[test]
fn export_csv_writes_joined_table() {
    let dataset = dataset();
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("joined.csv");
    let config = RenderConfig::default();

    assert!(Pipeline::new(&dataset, &config).export_csv(ymd(2020, 3, 2), &path).unwrap());
    let csv = std::fs::read_to_string(&path).unwrap();
    let mut lines = csv.lines();
    assert_eq!(lines.next(), Some("name,population,cases,rate"));
    assert_eq!(lines.count(), 4);
    assert!(csv.contains("Amsterdam,800000,20,2.5"));
}
