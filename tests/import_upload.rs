use axum::http::StatusCode;
use tokio_test::{assert_err, assert_ok};
use xueling_api::error::ApiError;
use xueling_api::import::{parse_upload, ImportError, Layout};

#[test]
fn headed_csv_with_bom_and_title_row() {
    let csv = "\u{feff}考研核心词汇 Unit 1,,,\n\
               单词,音标,词性,释义\n\
               abandon,/əˈbændən/,,vt.离弃，放弃\n\
               efficient,/ɪˈfɪʃnt/,adj.,高效的\n\
               单词,,,\n\
               ,,,\n\
               123,,,数字\n";

    let sheet = assert_ok!(parse_upload("unit1.csv", csv.as_bytes()));

    match sheet.layout {
        Layout::Headed(columns) => {
            assert_eq!(columns.english, 0);
            assert_eq!(columns.chinese, 3);
            assert_eq!(columns.pos, Some(2));
            assert_eq!(columns.ipa, Some(1));
        }
        Layout::Positional => panic!("expected a headed layout"),
    }

    assert_eq!(sheet.words.len(), 2);

    let abandon = &sheet.words[0];
    assert_eq!(abandon.english, "abandon");
    assert_eq!(abandon.pos, "vt.");
    assert_eq!(abandon.chinese, "离弃，放弃");
    assert_eq!(abandon.ipa, "/əˈbændən/");

    let efficient = &sheet.words[1];
    assert_eq!(efficient.pos, "adj.");
    assert_eq!(efficient.chinese, "高效的");

    // title row, repeated Chinese header and the numeric row
    assert_eq!(sheet.skipped, 3);
}

#[test]
fn positional_csv_with_ragged_rows() {
    let csv = "persistence,[pəˈsɪstəns],n. 坚持\n\
               strategy,策略\n\
               give up,v.&n. 放弃,extra,cells\n";

    let sheet = assert_ok!(parse_upload("list.CSV", csv.as_bytes()));

    assert_eq!(sheet.layout, Layout::Positional);
    assert_eq!(sheet.skipped, 0);

    let words: Vec<(&str, &str, &str, &str)> = sheet
        .words
        .iter()
        .map(|w| (w.english.as_str(), w.pos.as_str(), w.chinese.as_str(), w.ipa.as_str()))
        .collect();

    assert_eq!(
        words,
        vec![
            ("persistence", "n.", "坚持", "[pəˈsɪstəns]"),
            ("strategy", "", "策略", ""),
            ("give up", "v.&n.", "放弃", ""),
        ]
    );
}

#[test]
fn unsupported_extension_maps_to_415() {
    let err = assert_err!(parse_upload("words.docx", b"irrelevant"));
    assert!(matches!(err, ImportError::UnsupportedFormat(_)));

    let api_error: ApiError = err.into();
    assert_eq!(api_error.status_code(), StatusCode::UNSUPPORTED_MEDIA_TYPE);
}

#[test]
fn sheet_without_words_maps_to_400() {
    let csv = "单词,释义\n中文,中文\n,\n";
    let err = assert_err!(parse_upload("empty.csv", csv.as_bytes()));
    assert!(matches!(err, ImportError::NoUsableRows));

    let api_error: ApiError = err.into();
    assert_eq!(api_error.status_code(), StatusCode::BAD_REQUEST);
}
