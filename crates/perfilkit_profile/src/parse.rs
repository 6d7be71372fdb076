//! XML series parser kernel.
//!
//! Reads one profilometer document and yields an ordered series, matching
//! every `Data` element at any depth and its direct `X`/`Z` children.

use quick_xml::Reader;
use quick_xml::events::{BytesStart, Event};

use crate::conf::{C_ELEMENT_DATA, C_ELEMENT_X, C_ELEMENT_Z};
use crate::spec::{
    EnumProfileField, ParseProfileError, ReportParse, SpecProfilePoint, SpecProfileSeries,
    SpecSeriesCollection,
};

/// Pending state of one open `Data` element.
struct FrameDataElement {
    /// 1-based ordinal of this `Data` element in the document.
    n_idx_data: usize,
    /// Element depth at which the `Data` element was opened.
    n_depth_data: usize,
    /// Collected `X` text; `Some` once the child element was seen.
    x_text: Option<String>,
    /// Collected `Z` text; `Some` once the child element was seen.
    z_text: Option<String>,
    /// Field currently receiving text events.
    capture: Option<EnumProfileField>,
}

/// Parse one profilometer document into an ordered series.
///
/// A document with zero `Data` elements parses to an empty series. Any
/// failure discards the whole document; no partial series is returned.
pub fn parse_profile_document(
    v_document: &[u8],
    name: &str,
) -> Result<SpecProfileSeries, ParseProfileError> {
    let mut reader = Reader::from_reader(v_document);
    reader.config_mut().trim_text(true);

    let mut l_points: Vec<SpecProfilePoint> = Vec::new();
    let mut l_frames: Vec<FrameDataElement> = Vec::new();
    let mut buf = Vec::new();
    let mut n_depth = 0usize;
    let mut n_idx_data = 0usize;
    let mut n_roots = 0usize;

    loop {
        match reader.read_event_into(&mut buf) {
            Ok(Event::Start(ref e)) => {
                if n_depth == 0 {
                    n_roots += 1;
                    if n_roots > 1 {
                        return Err(derive_malformed(name, "junk after document element"));
                    }
                }
                n_depth += 1;
                handle_element_open(e, n_depth, &mut l_frames, &mut n_idx_data);
            }
            Ok(Event::Empty(ref e)) => {
                if n_depth == 0 {
                    n_roots += 1;
                    if n_roots > 1 {
                        return Err(derive_malformed(name, "junk after document element"));
                    }
                }
                if e.local_name().as_ref() == C_ELEMENT_DATA.as_bytes() {
                    // <Data/> can never hold its children.
                    return Err(ParseProfileError::MissingField {
                        name: name.to_string(),
                        field: EnumProfileField::X,
                        n_idx_data: n_idx_data + 1,
                    });
                }
                handle_empty_child(e, n_depth, &mut l_frames);
            }
            Ok(Event::End(ref e)) => {
                let mut if_close_data = false;
                if let Some(frame) = l_frames.last_mut() {
                    if n_depth == frame.n_depth_data + 1 && frame.capture.is_some() {
                        frame.capture = None;
                    } else if n_depth == frame.n_depth_data
                        && e.local_name().as_ref() == C_ELEMENT_DATA.as_bytes()
                    {
                        if_close_data = true;
                    }
                }
                if if_close_data
                    && let Some(frame_done) = l_frames.pop()
                {
                    l_points.push(finalize_data_frame(name, frame_done)?);
                }
                n_depth = n_depth.saturating_sub(1);
            }
            Ok(Event::Text(ref e)) => {
                handle_text_content(name, e.as_ref(), n_depth, &mut l_frames)?;
            }
            Ok(Event::CData(ref e)) => {
                handle_text_content(name, e.as_ref(), n_depth, &mut l_frames)?;
            }
            Ok(Event::Eof) => {
                if n_depth != 0 {
                    return Err(derive_malformed(name, "unexpected end of document"));
                }
                if n_roots == 0 {
                    return Err(derive_malformed(name, "no document element found"));
                }
                break;
            }
            Err(err) => return Err(derive_malformed(name, err)),
            _ => {}
        }
        buf.clear();
    }

    tracing::debug!(name, n_points = l_points.len(), "parsed profile document");

    Ok(SpecProfileSeries {
        name: name.to_string(),
        points: l_points,
    })
}

/// Parse a batch of named documents with per-document failure isolation.
///
/// Successes land in the collection (last write wins on duplicate names),
/// failures accumulate in the report; one bad document never aborts the rest.
pub fn parse_profile_batch(
    l_documents: &[(String, Vec<u8>)],
) -> (SpecSeriesCollection, ReportParse) {
    let mut collection = SpecSeriesCollection::new();
    let mut report = ReportParse::default();

    for (name, v_document) in l_documents {
        match parse_profile_document(v_document, name) {
            Ok(series) => {
                collection.insert(series);
                report.cnt_parsed += 1;
            }
            Err(err) => {
                report.cnt_failed += 1;
                report.errors.push(err);
            }
        }
    }

    (collection, report)
}

fn handle_element_open(
    e: &BytesStart<'_>,
    n_depth_element: usize,
    l_frames: &mut Vec<FrameDataElement>,
    n_idx_data: &mut usize,
) {
    let tag = e.local_name();
    if tag.as_ref() == C_ELEMENT_DATA.as_bytes() {
        *n_idx_data += 1;
        l_frames.push(FrameDataElement {
            n_idx_data: *n_idx_data,
            n_depth_data: n_depth_element,
            x_text: None,
            z_text: None,
            capture: None,
        });
        return;
    }

    let Some(frame) = l_frames.last_mut() else {
        return;
    };
    if n_depth_element != frame.n_depth_data + 1 {
        return;
    }

    let field = if tag.as_ref() == C_ELEMENT_X.as_bytes() {
        EnumProfileField::X
    } else if tag.as_ref() == C_ELEMENT_Z.as_bytes() {
        EnumProfileField::Z
    } else {
        return;
    };

    // Only the first occurrence of a child is read.
    let slot = match field {
        EnumProfileField::X => &mut frame.x_text,
        EnumProfileField::Z => &mut frame.z_text,
    };
    if slot.is_none() {
        *slot = Some(String::new());
        frame.capture = Some(field);
    }
}

fn handle_empty_child(e: &BytesStart<'_>, n_depth: usize, l_frames: &mut [FrameDataElement]) {
    let Some(frame) = l_frames.last_mut() else {
        return;
    };
    if n_depth != frame.n_depth_data {
        return;
    }

    let tag = e.local_name();
    let slot = if tag.as_ref() == C_ELEMENT_X.as_bytes() {
        &mut frame.x_text
    } else if tag.as_ref() == C_ELEMENT_Z.as_bytes() {
        &mut frame.z_text
    } else {
        return;
    };
    if slot.is_none() {
        // Present but textless; rejected as a number at finalize time.
        *slot = Some(String::new());
    }
}

fn handle_text_content(
    name: &str,
    v_text: &[u8],
    n_depth: usize,
    l_frames: &mut [FrameDataElement],
) -> Result<(), ParseProfileError> {
    if let Some(frame) = l_frames.last_mut()
        && let Some(field) = frame.capture
    {
        let txt = std::str::from_utf8(v_text).map_err(|err| derive_malformed(name, err))?;
        let slot = match field {
            EnumProfileField::X => &mut frame.x_text,
            EnumProfileField::Z => &mut frame.z_text,
        };
        if let Some(text) = slot.as_mut() {
            text.push_str(txt);
        }
        return Ok(());
    }

    if n_depth == 0 {
        return Err(derive_malformed(
            name,
            "text content outside of the document element",
        ));
    }
    Ok(())
}

fn finalize_data_frame(
    name: &str,
    frame: FrameDataElement,
) -> Result<SpecProfilePoint, ParseProfileError> {
    let x_text = frame.x_text.ok_or_else(|| ParseProfileError::MissingField {
        name: name.to_string(),
        field: EnumProfileField::X,
        n_idx_data: frame.n_idx_data,
    })?;
    let z_text = frame.z_text.ok_or_else(|| ParseProfileError::MissingField {
        name: name.to_string(),
        field: EnumProfileField::Z,
        n_idx_data: frame.n_idx_data,
    })?;

    Ok(SpecProfilePoint {
        x: parse_coordinate(name, EnumProfileField::X, frame.n_idx_data, &x_text)?,
        z: parse_coordinate(name, EnumProfileField::Z, frame.n_idx_data, &z_text)?,
    })
}

fn parse_coordinate(
    name: &str,
    field: EnumProfileField,
    n_idx_data: usize,
    text: &str,
) -> Result<f64, ParseProfileError> {
    text.trim()
        .parse::<f64>()
        .map_err(|_| ParseProfileError::InvalidNumber {
            name: name.to_string(),
            field,
            n_idx_data,
            text: text.to_string(),
        })
}

fn derive_malformed(name: &str, message: impl ToString) -> ParseProfileError {
    ParseProfileError::MalformedDocument {
        name: name.to_string(),
        message: message.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::{parse_profile_batch, parse_profile_document};
    use crate::spec::{EnumProfileField, ParseProfileError, SpecProfilePoint};

    #[test]
    fn parse_reads_points_in_document_order() {
        let doc = br#"<?xml version="1.0"?>
            <Measurement>
                <Data><X>0.0</X><Z>1.5</Z></Data>
                <Data><X>1.0</X><Z>2.0</Z></Data>
            </Measurement>"#;

        let series = parse_profile_document(doc, "probe.txt").expect("parse");
        assert_eq!(series.name, "probe.txt");
        assert_eq!(
            series.points,
            vec![
                SpecProfilePoint { x: 0.0, z: 1.5 },
                SpecProfilePoint { x: 1.0, z: 2.0 },
            ]
        );
    }

    #[test]
    fn parse_zero_data_elements_yields_empty_series() {
        let doc = b"<Measurement><Header>serial 42</Header></Measurement>";

        let series = parse_profile_document(doc, "empty.txt").expect("parse");
        assert!(series.is_empty());
    }

    #[test]
    fn parse_finds_data_elements_at_any_depth() {
        let doc = br#"<Report>
            <Block><Data><X>1</X><Z>2</Z></Data></Block>
            <Data><X>3</X><Z>4</Z></Data>
        </Report>"#;

        let series = parse_profile_document(doc, "nested.txt").expect("parse");
        assert_eq!(
            series.points,
            vec![
                SpecProfilePoint { x: 1.0, z: 2.0 },
                SpecProfilePoint { x: 3.0, z: 4.0 },
            ]
        );
    }

    #[test]
    fn parse_ignores_unrecognized_elements_and_accepts_scientific_notation() {
        let doc = br#"<M>
            <Data><Idx>7</Idx><X> 1.5e2 </X><Z>-0.25</Z><Flag/></Data>
        </M>"#;

        let series = parse_profile_document(doc, "sci.txt").expect("parse");
        assert_eq!(series.points, vec![SpecProfilePoint { x: 150.0, z: -0.25 }]);
    }

    #[test]
    fn parse_missing_z_child_is_a_failure_not_a_partial_series() {
        let doc = br#"<M>
            <Data><X>0.0</X><Z>1.5</Z></Data>
            <Data><X>1.0</X></Data>
        </M>"#;

        let err = parse_profile_document(doc, "gap.txt").expect_err("must fail");
        assert_eq!(
            err,
            ParseProfileError::MissingField {
                name: "gap.txt".to_string(),
                field: EnumProfileField::Z,
                n_idx_data: 2,
            }
        );
    }

    #[test]
    fn parse_empty_data_element_is_a_missing_field() {
        let doc = b"<M><Data/></M>";

        let err = parse_profile_document(doc, "bare.txt").expect_err("must fail");
        assert!(matches!(err, ParseProfileError::MissingField { .. }));
    }

    #[test]
    fn parse_rejects_non_numeric_coordinate_text() {
        let doc = b"<M><Data><X>abc</X><Z>1.0</Z></Data></M>";

        let err = parse_profile_document(doc, "text.txt").expect_err("must fail");
        assert_eq!(
            err,
            ParseProfileError::InvalidNumber {
                name: "text.txt".to_string(),
                field: EnumProfileField::X,
                n_idx_data: 1,
                text: "abc".to_string(),
            }
        );
    }

    #[test]
    fn parse_rejects_textless_coordinate_element() {
        let doc = b"<M><Data><X></X><Z>1.0</Z></Data></M>";

        let err = parse_profile_document(doc, "blank.txt").expect_err("must fail");
        assert!(matches!(
            err,
            ParseProfileError::InvalidNumber {
                field: EnumProfileField::X,
                ..
            }
        ));
    }

    #[test]
    fn parse_rejects_streams_that_are_not_xml_documents() {
        for v_document in [
            &b"plain text, definitely not markup"[..],
            &b""[..],
            &b"<M><Data><X>1</X><Z>2</Z>"[..],
            &b"<M><Data></M>"[..],
        ] {
            let err = parse_profile_document(v_document, "bad.txt").expect_err("must fail");
            assert!(
                matches!(err, ParseProfileError::MalformedDocument { .. }),
                "unexpected result for {v_document:?}: {err:?}"
            );
        }
    }

    #[test]
    fn parse_uses_first_occurrence_of_a_repeated_child() {
        let doc = b"<M><Data><X>1</X><X>9</X><Z>2</Z></Data></M>";

        let series = parse_profile_document(doc, "dup.txt").expect("parse");
        assert_eq!(series.points, vec![SpecProfilePoint { x: 1.0, z: 2.0 }]);
    }

    #[test]
    fn batch_isolates_failures_per_document() {
        let l_documents = vec![
            (
                "a.txt".to_string(),
                b"<M><Data><X>1</X><Z>2</Z></Data></M>".to_vec(),
            ),
            ("broken.txt".to_string(), b"not xml at all".to_vec()),
            (
                "b.txt".to_string(),
                b"<M><Data><X>3</X><Z>4</Z></Data></M>".to_vec(),
            ),
        ];

        let (collection, report) = parse_profile_batch(&l_documents);
        assert_eq!(collection.names(), vec!["a.txt", "b.txt"]);
        assert_eq!(report.cnt_parsed, 2);
        assert_eq!(report.cnt_failed, 1);
        assert_eq!(report.errors[0].document_name(), "broken.txt");
    }

    #[test]
    fn batch_keeps_last_series_for_duplicate_names() {
        let l_documents = vec![
            (
                "same.txt".to_string(),
                b"<M><Data><X>1</X><Z>2</Z></Data></M>".to_vec(),
            ),
            (
                "same.txt".to_string(),
                b"<M><Data><X>8</X><Z>9</Z></Data></M>".to_vec(),
            ),
        ];

        let (collection, report) = parse_profile_batch(&l_documents);
        assert_eq!(collection.len(), 1);
        assert_eq!(report.cnt_parsed, 2);
        assert_eq!(
            collection.get("same.txt").expect("series").points,
            vec![SpecProfilePoint { x: 8.0, z: 9.0 }]
        );
    }
}
