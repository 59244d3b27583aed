mod common;

use common::{counter, deflate, with_page_tree, Fixture};
use pagegraft::{
    pdf::{object::stream::filter::decode_chain, Filter, Reference},
    ErrorKind, ExportedObject, Object,
};

fn data(objects: &[ExportedObject]) -> Vec<(u32, String)> {
    objects
        .iter()
        .map(|o| (o.id, String::from_utf8_lossy(&o.data).into_owned()))
        .collect()
}

#[test]
fn diamond_references_are_exported_once() {
    let doc = with_page_tree("")
        .object(10, "<< /B 12 0 R /A 11 0 R >>")
        .object(11, "<< /Shared 13 0 R >>")
        .object(12, "[13 0 R 13 0 R]")
        .object(13, "(leaf)")
        .section("/Root 1 0 R")
        .open();

    let exported = doc
        .export(&Object::Reference(Reference::new(10)), &mut counter(100))
        .unwrap();
    assert_eq!(
        data(&exported),
        vec![
            (100, "<</A 101 0 R /B 102 0 R>>".to_owned()),
            (101, "<</Shared 103 0 R>>".to_owned()),
            (103, "(leaf)".to_owned()),
            (102, "[103 0 R 103 0 R]".to_owned()),
        ]
    );
}

#[test]
fn cycles_terminate() {
    let doc = with_page_tree("")
        .object(20, "<< /Next 21 0 R >>")
        .object(21, "<< /Next 20 0 R /Self 21 0 R >>")
        .section("/Root 1 0 R")
        .open();

    let exported = doc
        .export(&Object::Reference(Reference::new(20)), &mut counter(1))
        .unwrap();
    assert_eq!(
        data(&exported),
        vec![
            (1, "<</Next 2 0 R>>".to_owned()),
            (2, "<</Next 1 0 R /Self 2 0 R>>".to_owned()),
        ]
    );
}

#[test]
fn direct_root() {
    let doc = with_page_tree("").object(5, "42").section("/Root 1 0 R").open();

    let root = Object::Array(vec![Object::Reference(Reference::new(5)), Object::from(7i64)].into());
    let exported = doc.export(&root, &mut counter(1)).unwrap();
    assert_eq!(
        data(&exported),
        vec![(1, "[2 0 R 7]".to_owned()), (2, "42".to_owned())]
    );
}

#[test]
fn streams_are_reencoded() {
    let content = b"0 0 m 100 100 l S\n".repeat(20);
    let doc = with_page_tree("3 0 R")
        .object(
            3,
            "<< /Type /Page /Parent 2 0 R /Contents 4 0 R /MediaBox [0 0 10 10] >>",
        )
        .stream(
            4,
            "/Filter /FlateDecode /DecodeParms << /Predictor 1 >> /Extra /Kept",
            &deflate(&content),
        )
        .section("/Root 1 0 R")
        .open();

    let page = doc.page_object(0).unwrap();
    let exported = doc.export(&page, &mut counter(50)).unwrap();
    assert_eq!(exported.iter().map(|o| o.id).collect::<Vec<_>>(), vec![50, 51]);
    assert_eq!(
        String::from_utf8_lossy(&exported[0].data),
        "<</Contents 51 0 R /MediaBox [0 0 10 10] /Type /Page>>"
    );

    let stream = &exported[1].data;
    let start = stream.windows(8).position(|w| w == b"\nstream\n").unwrap() + 8;
    let end = stream.windows(10).rposition(|w| w == b"\nendstream").unwrap();
    let dictionary = String::from_utf8_lossy(&stream[..start - 8]).into_owned();
    assert_eq!(
        dictionary,
        format!(
            "<</Extra /Kept /Filter [/ASCII85Decode /FlateDecode] /Length {}>>",
            end - start
        )
    );
    assert!(stream[start..end].ends_with(b"~>"));
    assert!(!dictionary.contains("DecodeParms"));

    let decoded = decode_chain(&[Filter::Ascii85, Filter::Flate], stream[start..end].to_vec()).unwrap();
    assert_eq!(decoded, content);
}

#[test]
fn page_export_leaves_other_pages_out() {
    let doc = with_page_tree("3 0 R 5 0 R")
        .object(3, "<< /Type /Page /Parent 2 0 R /Contents 4 0 R >>")
        .stream(4, "", b"0 0 m S")
        .object(5, "<< /Type /Page /Parent 2 0 R /Contents 6 0 R >>")
        .stream(6, "", b"1 1 m S")
        .section("/Root 1 0 R")
        .open();

    let exported = doc.export(&doc.page_object(0).unwrap(), &mut counter(1)).unwrap();
    assert_eq!(exported.iter().map(|o| o.id).collect::<Vec<_>>(), vec![1, 2]);
    assert_eq!(String::from_utf8_lossy(&exported[0].data), "<</Contents 2 0 R /Type /Page>>");
    assert!(exported.iter().all(|o| !String::from_utf8_lossy(&o.data).contains("Kids")));

    let stream = &exported[1].data;
    let start = stream.windows(8).position(|w| w == b"\nstream\n").unwrap() + 8;
    let end = stream.windows(10).rposition(|w| w == b"\nendstream").unwrap();
    let decoded = decode_chain(&[Filter::Ascii85, Filter::Flate], stream[start..end].to_vec()).unwrap();
    assert_eq!(decoded, b"0 0 m S");
}

#[test]
fn exported_pages_keep_inherited_attributes() {
    let mut fixture = Fixture::new();
    let doc = fixture
        .object(1, "<< /Type /Catalog /Pages 2 0 R >>")
        .object(
            2,
            "<< /Type /Pages /Kids [3 0 R] /MediaBox [0 0 595 842] /Rotate 90 /Resources 4 0 R >>",
        )
        .object(3, "<< /Type /Page /Parent 2 0 R /Rotate 0 >>")
        .object(4, "<< /ExtGState << /GS1 << /LW 2 >> >> >>")
        .section("/Root 1 0 R")
        .open();

    let exported = doc.export(&doc.page_object(0).unwrap(), &mut counter(10)).unwrap();
    assert_eq!(
        data(&exported),
        vec![
            (
                10,
                "<</MediaBox [0 0 595 842] /Resources 11 0 R /Rotate 0 /Type /Page>>".to_owned()
            ),
            (11, "<</ExtGState <</GS1 <</LW 2>>>>>>".to_owned()),
        ]
    );
}

#[test]
fn write_indirect() {
    let doc = with_page_tree("").object(5, "<< /N 6 0 R >>").object(6, "1").section("/Root 1 0 R").open();
    let exported = doc
        .export(&Object::Reference(Reference::new(5)), &mut counter(7))
        .unwrap();

    let mut out = Vec::<u8>::new();
    for object in &exported {
        object.write_indirect(&mut out);
    }
    assert_eq!(out, b"7 0 obj\n<</N 8 0 R>>\nendobj\n8 0 obj\n1\nendobj\n".to_vec());
}

#[test]
fn export_failures() {
    let mut doc = with_page_tree("")
        .object(5, "<< /Missing 99 0 R >>")
        .section("/Root 1 0 R")
        .open();

    let err = doc
        .export(&Object::Reference(Reference::new(5)), &mut counter(1))
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Format);

    doc.close();
    let err = doc
        .export(&Object::Reference(Reference::new(5)), &mut counter(1))
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Closed);
}
