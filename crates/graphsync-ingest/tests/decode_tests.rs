use chrono::NaiveDate;
use graphsync_core::vocab;
use graphsync_core::{ContextNamespaces, IrError, Serializer, UpdateStatement};
use graphsync_ingest::{NdjsonReader, OrganizationMap, RecordDecoder};
use serde_json::json;
use std::io::{BufReader, Write};
use std::sync::{Arc, Mutex};

fn serializer() -> Serializer {
    Serializer::new(ContextNamespaces::new("http://example.org/ctx/"))
        .with_valid_on(NaiveDate::from_ymd_opt(2024, 5, 1).unwrap())
}

#[derive(Clone, Default)]
struct SharedBuf(Arc<Mutex<Vec<u8>>>);

impl Write for SharedBuf {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        self.0.lock().unwrap().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> std::io::Result<()> {
        Ok(())
    }
}

impl SharedBuf {
    fn contents(&self) -> String {
        String::from_utf8(self.0.lock().unwrap().clone()).unwrap()
    }
}

fn capture_logs<T>(f: impl FnOnce() -> T) -> (T, String) {
    let buf = SharedBuf::default();
    let writer = buf.clone();
    let subscriber = tracing_subscriber::fmt()
        .with_ansi(false)
        .with_max_level(tracing::Level::DEBUG)
        .with_writer(move || writer.clone())
        .finish();
    let out = tracing::subscriber::with_default(subscriber, f);
    (out, buf.contents())
}

#[test]
fn jane_doe_label_supersede_from_json() {
    let value = json!({
        "@id": "1234",
        "@id_ns": "people/",
        "@graph": "g1",
        "@type": ["Person"],
        "@label": "Jane Doe",
        "!label": true
    });
    let record = RecordDecoder::default().decode_record(&value).unwrap();
    let out = serializer().serialize(&record).unwrap();

    assert_eq!(out.len(), 6);
    assert!(matches!(
        &out[0],
        UpdateStatement::Delete { predicate: Some(p), .. } if p == vocab::DCTERMS_VALID
    ));
    assert_eq!(out[1].triples()[0].predicate, vocab::DCTERMS_VALID);
    assert_eq!(out[2].triples()[0].predicate, vocab::RDF_TYPE);
    assert!(!out[2].is_delete());
    for (stmt, predicate) in out[3..5].iter().zip(vocab::LABEL_PREDICATES) {
        assert!(matches!(
            stmt,
            UpdateStatement::Delete { predicate: Some(p), subject, .. }
                if p == predicate && subject == "people/1234"
        ));
    }
    let labels = out[5].triples();
    assert_eq!(labels.len(), 2);
    assert!(labels.iter().all(|t| t.object.to_string() == "\"Jane Doe\""));
    assert!(out.iter().all(|s| s.graph() == "g1"));
}

#[test]
fn missing_id_is_rejected_before_any_statement() {
    let record = RecordDecoder::default()
        .decode_record(&json!({"@graph": "g1", "@label": "Nobody"}))
        .unwrap();
    assert_eq!(serializer().serialize(&record), Err(IrError::MissingId));
}

#[test]
fn literal_language_and_datatype_cannot_break_out_of_the_update() {
    let tag = "en . } }; DROP ALL ; INSERT DATA { GRAPH <http://g> { <http://s> <http://p> \"x\"@en";
    let record = RecordDecoder::default()
        .decode_record(&json!({
            "@id": "http://example.org/people/1",
            "@graph": "http://example.org/g",
            "http://example.org/p": {"@value": "v", "@language": tag}
        }))
        .unwrap();
    assert_eq!(
        serializer().serialize(&record),
        Err(IrError::InvalidLanguageTag {
            id: "http://example.org/people/1".into(),
            tag: tag.into(),
        })
    );

    let record = RecordDecoder::default()
        .decode_record(&json!({
            "@id": "http://example.org/people/1",
            "@graph": "http://example.org/g",
            "@positions": [{
                "@org_code": "MED",
                "http://example.org/p": {"@value": "v", "@type": "http://x.org/dt> . } }; DROP ALL ; #"}
            }]
        }))
        .unwrap();
    assert!(matches!(
        serializer().serialize(&record),
        Err(IrError::InvalidIri { .. })
    ));

    let record = RecordDecoder::default()
        .decode_record(&json!({
            "@id": "http://example.org/people/1",
            "@graph": "http://example.org/g",
            "@label": {"@value": "Jane", "@language": "en-US"}
        }))
        .unwrap();
    let text = serializer().serialize_to_string(&record).unwrap();
    assert!(text.contains("\"Jane\"@en-US"));
}

#[test]
fn nested_advisees_and_positions_decode_and_serialize() {
    let mut orgs = OrganizationMap::new("http://example.org/org/unmapped");
    orgs.insert("MED", "http://example.org/org/med");
    let value = json!({
        "@id": "http://example.org/people/prof",
        "@graph": "http://example.org/g/people",
        "@advisees": [
            {"@id": "http://example.org/people/s1", "@label": "Student One"},
            {"@id": "http://example.org/people/s2", "@graph": "http://example.org/g/students"}
        ],
        "@positions": {"@org_code": "MED", "@label": "Professor"}
    });
    let record = RecordDecoder::new(orgs).decode_record(&value).unwrap();
    assert_eq!(record.advisees.len(), 2);
    assert_eq!(record.positions[0].organization, "http://example.org/org/med");

    let out = serializer().serialize(&record).unwrap();
    let relationship_blocks: Vec<_> = out
        .iter()
        .filter(|s| {
            s.triples()
                .iter()
                .any(|t| t.object.as_iri() == Some(vocab::VIVO_ADVISING_RELATIONSHIP))
        })
        .collect();
    assert_eq!(relationship_blocks.len(), 2);
    assert!(relationship_blocks
        .iter()
        .all(|s| s.graph() == "http://example.org/g/people"));
    assert!(out
        .iter()
        .any(|s| s.graph() == "http://example.org/g/students"));
}

#[test]
fn unmapped_organization_warns_and_uses_placeholder() {
    let decoder = RecordDecoder::new(OrganizationMap::new("http://example.org/org/unmapped"));
    let value = json!({
        "@id": "http://example.org/people/1",
        "@graph": "http://example.org/g",
        "@positions": [{"@org_code": "NOPE"}]
    });
    let (record, logs) = capture_logs(|| decoder.decode_record(&value).unwrap());
    assert_eq!(
        record.positions[0].organization,
        "http://example.org/org/unmapped"
    );
    assert!(logs.contains("WARN"), "logs: {logs}");
    assert!(logs.contains("unmapped organization"), "logs: {logs}");
    assert!(logs.contains("NOPE"), "logs: {logs}");
}

#[test]
fn malformed_ndjson_lines_are_logged_with_line_numbers() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    writeln!(file, r#"{{"@id": "http://example.org/a", "@graph": "http://example.org/g"}}"#).unwrap();
    writeln!(file, "{{oops").unwrap();
    writeln!(file, r#"{{"@id": "http://example.org/b", "@graph": "http://example.org/g"}}"#).unwrap();

    let input = BufReader::new(std::fs::File::open(file.path()).unwrap());
    let (records, logs) = capture_logs(|| {
        NdjsonReader::new(input)
            .map(|line| line.unwrap())
            .map(|line| RecordDecoder::default().decode_record(&line.value).unwrap())
            .collect::<Vec<_>>()
    });

    assert_eq!(records.len(), 2);
    assert_eq!(records[1].id, "http://example.org/b");
    assert!(logs.contains("ERROR"), "logs: {logs}");
    assert!(logs.contains("line=2"), "logs: {logs}");
}

#[test]
fn organization_map_loads_from_file() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    write!(file, r#"{{"MED": "http://example.org/org/med", "ENG": "http://example.org/org/eng"}}"#).unwrap();
    let map = OrganizationMap::from_path(file.path(), "http://example.org/org/unmapped").unwrap();
    assert_eq!(map.len(), 2);
    assert_eq!(map.lookup("ENG"), Some("http://example.org/org/eng"));
}
