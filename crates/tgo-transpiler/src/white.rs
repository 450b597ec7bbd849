//! Classification of the material between two statements.

use tgo_parser::Comment;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WhiteKind {
    /// Spaces and tabs.
    White,
    /// A newline and the spaces and tabs after it.
    Indent,
    /// An explicit `;`.
    Semi,
    /// A line or block comment.
    Comment,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct White<'a> {
    pub kind: WhiteKind,
    /// Source offset of `text`.
    pub offset: u32,
    pub text: &'a str,
}

/// Split `src[start..end]` into whitespace, indentation, semicolons and
/// comments.
///
/// The range must lie between two syntax nodes, so nothing else may occur
/// in it. Carriage returns are rejected before transpiling starts.
pub fn iter_white<'a>(
    src: &'a str,
    comments: &'a [Comment],
    start: u32,
    end: u32,
) -> impl Iterator<Item = White<'a>> + 'a {
    let first = comments.partition_point(|c| c.span.start < start);
    let inside = comments[first..]
        .iter()
        .take_while(move |c| c.span.end <= end);

    let mut out = Vec::new();
    let mut last = start;
    for comment in inside {
        split_blank(src, last, comment.span.start, &mut out);
        out.push(White {
            kind: WhiteKind::Comment,
            offset: comment.span.start,
            text: &src[comment.span.to_range()],
        });
        last = comment.span.end;
    }
    split_blank(src, last, end, &mut out);
    out.into_iter()
}

fn split_blank<'a>(src: &'a str, start: u32, end: u32, out: &mut Vec<White<'a>>) {
    let mut chunk_start = start as usize;
    let mut kind = WhiteKind::White;

    let flush = |out: &mut Vec<White<'a>>, from: usize, to: usize, kind: WhiteKind| {
        if from < to {
            out.push(White {
                kind,
                offset: from as u32,
                text: &src[from..to],
            });
        }
    };

    for (i, b) in src.as_bytes()[start as usize..end as usize]
        .iter()
        .enumerate()
        .map(|(i, b)| (i + start as usize, *b))
    {
        match b {
            b' ' | b'\t' => {}
            b';' => {
                flush(out, chunk_start, i, kind);
                out.push(White {
                    kind: WhiteKind::Semi,
                    offset: i as u32,
                    text: ";",
                });
                kind = WhiteKind::White;
                chunk_start = i + 1;
            }
            b'\n' => {
                flush(out, chunk_start, i, kind);
                kind = WhiteKind::Indent;
                chunk_start = i;
            }
            other => panic!(
                "unexpected byte {:?} between statements at offset {i}",
                other as char
            ),
        }
    }
    flush(out, chunk_start, end as usize, kind);
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn kinds(src: &str, start: u32, end: u32) -> Vec<(WhiteKind, String)> {
        let file = tgo_parser::parse(src).unwrap();
        iter_white(src, &file.comments, start, end)
            .map(|w| {
                assert_eq!(&src[w.offset as usize..w.offset as usize + w.text.len()], w.text);
                (w.kind, w.text.to_string())
            })
            .collect()
    }

    #[test]
    fn test_split_between_statements() {
        let src = "package a\nfunc f() {\n\ta() ; /* x */\n\n\t// y\n\tb()\n}\n";
        let start = src.find("a()").unwrap() as u32 + 3;
        let end = src.find("b()").unwrap() as u32;
        assert_eq!(
            kinds(src, start, end),
            vec![
                (WhiteKind::White, " ".to_string()),
                (WhiteKind::Semi, ";".to_string()),
                (WhiteKind::White, " ".to_string()),
                (WhiteKind::Comment, "/* x */".to_string()),
                (WhiteKind::Indent, "\n".to_string()),
                (WhiteKind::Indent, "\n\t".to_string()),
                (WhiteKind::Comment, "// y".to_string()),
                (WhiteKind::Indent, "\n\t".to_string()),
            ]
        );
    }

    #[test]
    fn test_empty_range() {
        let src = "package a\n";
        assert!(iter_white(src, &[], 3, 3).next().is_none());
    }

    #[test]
    fn test_offsets_point_into_source() {
        let src = "package a\nfunc f() {\n\tx := 1 // c\n\t\ty()\n}\n";
        let file = tgo_parser::parse(src).unwrap();
        let start = src.find("1").unwrap() as u32 + 1;
        let end = src.find("y()").unwrap() as u32;
        let whites: Vec<_> = iter_white(src, &file.comments, start, end).collect();
        assert_eq!(whites.last().unwrap().text, "\n\t\t");
        for w in whites {
            assert!(src[w.offset as usize..].starts_with(w.text));
        }
    }
}
