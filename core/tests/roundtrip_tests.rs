// Round-trip corpus: serialize(parse(s)) must equal s, and the result
// must stay stable over repeated parse/serialize cycles.

use chrono::{DateTime, TimeZone, Utc};
use notedown_core::parse;
use pretty_assertions::assert_eq;

fn reference() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2021, 1, 1, 0, 0, 0).unwrap()
}

fn assert_round_trip(input: &str) {
    let doc = parse(input, reference()).unwrap_or_else(|err| {
        panic!("parse failed for {:?}: {}", input, err);
    });
    assert_eq!(doc.markdown(), input, "round-trip failed for {:?}", input);
}

const CORPUS: &[&str] = &[
    "hello\n",
    "a\nb\n",
    "a\n\nb\n",
    "\n",
    "\n\n\n",
    "# Heading\n",
    "## Two\ntext\n### Three\n",
    "# A\n\npara\n## B\ncontent\n",
    "   # indented heading\n",
    "#\n",
    "Title\n===\n",
    "Title\n=====\nbody\n",
    "one\ntwo\n---\n",
    "---\n",
    "***\n",
    "- - -\n",
    "  ___  \n",
    "- Hello\n  - World\n",
    "- a\n- b\n- c\n",
    "* a\n\n* b\n",
    "+ item\n",
    "1. first\n2. second\n",
    "3. third\n4. fourth\n",
    "1) paren\n",
    "- a\n- - -\n",
    "- multi\n  line\n",
    "- a\n      code\n",
    "-\n",
    "- \n",
    "- [ ] Task\n",
    "- [x] Done\n  note\n",
    "- [ ] Task due:2021-01-01 scheduled:2021-01-02 completed:2021-01-03 priority:1 every:day\n",
    "- [ ] Repeat every:mon wed fri\n",
    "- [b] Blocked priority:2\n",
    "- [ ] a\n- [x] b\n",
    "- [ ] a\n\n- [x] b\n",
    "> quote\n",
    "> a\n> b\n",
    "> a\n>\n> b\n",
    "> # Foo\n> bar\n> baz\n",
    "> > deep\n",
    "  > indented quote\n",
    "```\ncode\n```\n",
    "```go\npackage main\n\nfunc main() {}\n```\n",
    "~~~\ntext\n~~~\n",
    "```\ncode\n",
    "```\n\n```\n",
    "```\n```\n",
    "````\n```\n````\n",
    "    indented code\n",
    "    a\n\n    b\n",
    "\tcode\n",
    "---\ntitle: \"Hello\"\n---\n# Heading\n",
    "---\na: 1\nb: 2\n---\n",
    "---\n---\nbody\n",
    "<!-- comment -->\n",
    "<!--\nmulti\n-->\n",
    "<?php echo 1; ?>\n",
    "<!DOCTYPE html>\n",
    "<![CDATA[\ndata\n]]>\n",
    "<div>\nhello\n</div>\n\npara\n",
    "<script>\nvar x = 1;\n</script>\n",
    "<custom-tag>\n",
    "</closing>\n\npara\n",
    "# Top\n- item\n  > quoted\n",
    "# 1\n## 2\n### 3\n## 2b\n# 1b\n",
    "> - a\n> - b\n",
    "- > - x\n",
    "- Title\n  ---\n",
    "- [ ] build\n  ```sh\n  make\n  ```\n",
    "1. a\n   1. b\n",
    "> ---\n> a: 1\n> ---\n",
    "para\n# heading\n",
    "para\n- item\n",
    "para\n2. item\n",
    "para\n<custom-tag>\n",
    "``\nnot fenced\n",
    "#hashtag is a paragraph\n",
    "####### seven hashes\n",
];

#[test]
fn round_trip_corpus() {
    for input in CORPUS {
        assert_round_trip(input);
    }
}

#[test]
fn round_trip_is_stable_over_ten_iterations() {
    for input in CORPUS {
        let mut current = (*input).to_string();
        for iteration in 0..10 {
            let doc = parse(&current, reference()).unwrap();
            let next = doc.markdown();
            if iteration > 0 {
                assert_eq!(next, current, "unstable at iteration {}", iteration);
            }
            current = next;
        }
        assert_eq!(current, *input);
    }
}

#[test]
fn round_trip_mixed_document() {
    let input = "---\ntitle: \"Notes\"\n---\n# Inbox\n\n- [ ] Call due:2021-02-01 priority:1\n- [x] Mail every:2 weeks\n\n## Reference\n\n> quoted\n> lines\n\n```sh\nls -la\n```\n\nclosing paragraph\n";
    assert_round_trip(input);
}

#[test]
fn prefix_failure_does_not_corrupt_following_blocks() {
    // A fence that never opens (two backticks) must leave the
    // following content intact as paragraph text
    let doc = parse("``\nplain text\n", reference()).unwrap();
    assert_eq!(doc.markdown(), "``\nplain text\n");

    // An invalid front matter block falls back without shifting the
    // rest of the document
    let doc = parse("---\nnot: [valid\n---\nafter\n", reference()).unwrap();
    assert_eq!(doc.markdown(), "---\nnot: [valid\n---\nafter\n");
}

#[test]
fn empty_input_serializes_empty() {
    let doc = parse("", reference()).unwrap();
    assert_eq!(doc.markdown(), "");
}
