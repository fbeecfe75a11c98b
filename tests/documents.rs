use notemark::config::Options;
use notemark::markdown::anchors::heading_anchors;
use notemark::markdown::helper::*;
use notemark::markdown::{
    from_markdown, from_markdown_with, to_markdown, ImageAlign, ImageAttrs, SchemaError, XmdNode,
    XmdNodeType,
};
use notemark::model::{Fragment, Node, NodeType};
use notemark::payload::{PayloadError, PayloadState};
use notemark::transform::AttrStep;
use serde_json::json;
use std::time::{Duration, Instant};

fn first_block(doc: &XmdNode) -> &XmdNode {
    doc.child(0).unwrap()
}

#[test]
fn unterminated_constructs_stay_text() {
    let cases = [
        ("::: warning\nstill open", "::: warning\nstill open"),
        ("<details>\n<summary>S</summary>\nbody", "<details>\n<summary>S</summary>\nbody"),
        ("before ::spoiler[never [closed] after", "before ::spoiler[never [closed] after"),
        ("```mindmap\n{\"text\": \"x\"}", "```mindmap\n{\"text\": \"x\"}"),
    ];
    for (src, text) in cases {
        assert_eq!(from_markdown(src), doc(p(text)), "parsing {:?}", src);
    }

    let d = from_markdown("::: info\nopen\n\n# Heading");
    assert_eq!(d, doc(vec![p("::: info\nopen"), h1("Heading")]));
}

#[test]
fn unterminated_openers_stay_fast() {
    let sources = [
        "::: info\n".repeat(256),
        "<details>\n::: tip\n".repeat(128),
        "::: details\n<details>\n".repeat(128),
    ];
    for src in sources {
        let started = Instant::now();
        let d = from_markdown(&src);
        assert!(started.elapsed() < Duration::from_secs(10), "parsing took {:?}", started.elapsed());
        assert_eq!(d, doc(p(src.trim_end())));
    }
}

#[test]
fn structural_whitespace_round_trip() {
    let cases = [
        doc(vec![p("a"), p(" "), p("b")]),
        doc(vec![p("  \t"), callout("info", vec![p("\n\n")])]),
        doc(p("a\n \nb\n\n\nc  \nd\r")),
        doc(p(vec![node(" "), hard_break(), node("\u{a0}\n")])),
        doc(h1("two\nlines")),
    ];
    for d in cases {
        let text = to_markdown(&d);
        assert_eq!(from_markdown(&text), d, "reading back {:?}", text);
    }
}

#[test]
fn unknown_callout_keyword_is_code() {
    let d = from_markdown(":::danger\nBe careful\n:::");
    assert_eq!(d, doc(code_block("danger", "Be careful")));
    assert_eq!(to_markdown(&d), "```danger\nBe careful\n```\n");
}

#[test]
fn image_layout_round_trip() {
    let src = "<img src=\"a.png\" alt=\"A\" width=\"60\" data-align=\"left\">\n";
    let d = from_markdown(src);
    assert_eq!(
        d,
        doc(p(image_with(ImageAttrs {
            src: "a.png".into(),
            alt: "A".into(),
            width: 60,
            align: ImageAlign::Left,
            ..ImageAttrs::default()
        })))
    );
    assert_eq!(to_markdown(&d), src);

    let plain = from_markdown("<img src=\"b.png\" alt=\"B\" width=\"100\" data-align=\"center\">");
    assert_eq!(to_markdown(&plain), "![B](b.png)\n");
}

#[test]
fn nesting_limit() {
    let mut src = String::new();
    for _ in 0..40 {
        src.push_str("::: info\n");
    }
    src.push_str("core\n");
    for _ in 0..40 {
        src.push_str(":::\n");
    }
    let d = from_markdown(&src);
    let mut depth = 0;
    let mut node = first_block(&d);
    while let XmdNode::Callout(_) = node {
        depth += 1;
        node = node.child(0).unwrap();
    }
    assert_eq!(depth, Options::default().max_depth);

    let shallow = Options {
        max_depth: 0,
        ..Options::default()
    };
    assert_eq!(
        from_markdown_with("::: tip\nx\n:::", &shallow),
        doc(p("::: tip\nx\n:::"))
    );
}

#[test]
fn quiz_node_state() {
    let d = from_markdown(
        "```quiz\n{\"question\": \"Capital?\", \"options\": [\"Paris\", \"Rome\"], \"correctAnswer\": \"Rome\"}\n```",
    );
    let quiz = match first_block(&d) {
        XmdNode::Quiz(leaf) => leaf.attrs.state(),
        other => panic!("expected a quiz, got {:?}", other),
    };
    let quiz = quiz.ready().unwrap();
    assert_eq!(quiz.correct_answers, vec!["1"]);
    assert!(quiz.grade(["1"]));
    assert!(!quiz.grade(["0"]));

    let broken = from_markdown("```quiz\n{\"options\": []}\n```");
    match first_block(&broken) {
        XmdNode::Quiz(leaf) => assert!(matches!(
            leaf.attrs.state(),
            PayloadState::Invalid(PayloadError::Malformed(_))
        )),
        other => panic!("expected a quiz, got {:?}", other),
    }
    assert_eq!(to_markdown(&broken), "```quiz\n{\"options\": []}\n```\n");
}

#[test]
fn mind_map_passes_through() {
    let data = "{\"text\": \"Root\",\n  \"children\": [{\"text\": \"Leaf\"}]}";
    let src = format!("```mindmap\n{}\n```\n", data);
    let d = from_markdown(&src);
    assert_eq!(d, doc(mind_map(data)));
    assert_eq!(to_markdown(&d), src);
    match first_block(&d) {
        XmdNode::MindMap(leaf) => {
            let map = leaf.attrs.state();
            let map = map.ready().unwrap();
            assert_eq!(map.node_count(), 2);
            assert_eq!(map.children[0].id, "root-0");
        }
        other => panic!("expected a mind map, got {:?}", other),
    }
}

#[test]
fn json_form() {
    let d = from_markdown("# Title\n\n::: tip\nSee ::spoiler[this]\n:::");
    let value = serde_json::to_value(&d).unwrap();
    assert_eq!(
        value,
        json!({
            "type": "doc",
            "content": [
                {"type": "heading", "attrs": {"level": 1}, "content": [{"type": "text", "text": "Title"}]},
                {"type": "callout", "attrs": {"category": "tip"}, "content": [
                    {"type": "paragraph", "content": [
                        {"type": "text", "text": "See "},
                        {"type": "text", "text": "this", "marks": [{"type": "spoiler"}]}
                    ]}
                ]}
            ]
        })
    );
    let back: XmdNode = serde_json::from_value(value).unwrap();
    assert_eq!(back, d);
}

#[test]
fn content_rules() {
    let inner = Fragment::from(vec![p("x")]);
    assert!(matches!(
        XmdNodeType::Paragraph.create(json!(null), inner),
        Err(SchemaError::InvalidContent(XmdNodeType::Paragraph))
    ));
    assert!(!XmdNodeType::Doc.valid_content(&Fragment::new()));

    let image = XmdNodeType::Image
        .create(json!({"src": "x.png", "width": 500, "align": "diagonal", "extra": 1}), Fragment::new())
        .unwrap();
    assert_eq!(image, image_with(ImageAttrs { src: "x.png".into(), ..ImageAttrs::default() }));
}

#[test]
fn anchors_and_steps() {
    let d = from_markdown("# Intro\n\n## Intro\n\n![pic](p.png)");
    let anchors = heading_anchors(&d);
    let slugs: Vec<_> = anchors.iter().map(|a| a.slug.as_str()).collect();
    assert_eq!(slugs, vec!["intro", "intro-1"]);

    // heading 0..7, heading 7..14, paragraph 14..17 with the image at 15
    let resized = AttrStep::new(15, "width", json!("50%")).apply(&d).unwrap();
    assert!(to_markdown(&resized).ends_with(
        "<img src=\"p.png\" alt=\"pic\" width=\"50\" data-align=\"center\">\n"
    ));
}
