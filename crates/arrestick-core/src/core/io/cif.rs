use std::collections::HashMap;
use thiserror::Error;

/// A PDBx/mmCIF data block, reduced to its categories of tabular values.
///
/// Only the first `data_` block of a file is read. Save frames are skipped.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CifDocument {
    name: Option<String>,
    categories: HashMap<String, Category>,
}

/// The rows of one category. Key-value items form a single-row category.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Category {
    columns: Vec<String>,
    rows: Vec<Vec<String>>,
    looped: bool,
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum CifError {
    #[error("Parse error on line {line}: {kind}")]
    Syntax { line: usize, kind: CifSyntaxErrorKind },
    #[error("Category '{0}' not found")]
    MissingCategory(String),
    #[error("Item '{item}' not found in category '{category}'")]
    MissingItem { category: String, item: String },
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum CifSyntaxErrorKind {
    #[error("text field opened with ';' is never closed")]
    UnterminatedTextField,
    #[error("quoted value is never closed")]
    UnterminatedQuote,
    #[error("tag '{0}' has no value")]
    MissingValue(String),
    #[error("value '{0}' does not belong to any tag")]
    DanglingValue(String),
    #[error("loop_ declares no tags")]
    EmptyLoop,
    #[error("loop_ mixes categories '{first}' and '{other}'")]
    MixedLoop { first: String, other: String },
    #[error("loop_ for '{category}' has {values} values for {columns} columns")]
    RaggedLoop {
        category: String,
        values: usize,
        columns: usize,
    },
    #[error("item '{0}' is defined more than once")]
    DuplicateItem(String),
    #[error("category '{0}' mixes loop_ and single-item forms")]
    MixedForm(String),
}

#[derive(Debug, Clone, PartialEq)]
enum Token {
    DataBlock(String),
    SaveFrame,
    Loop,
    Tag(String),
    Value(String),
}

#[derive(Debug, Clone, PartialEq)]
struct Spanned {
    token: Token,
    line: usize,
}

fn syntax(line: usize, kind: CifSyntaxErrorKind) -> CifError {
    CifError::Syntax { line, kind }
}

impl CifDocument {
    pub fn parse(text: &str) -> Result<Self, CifError> {
        let tokens = tokenize(text)?;
        let mut tokens = tokens.into_iter().peekable();
        let mut document = Self::default();
        let mut in_block = false;

        while let Some(Spanned { token, line }) = tokens.next() {
            match token {
                Token::DataBlock(name) => {
                    if in_block {
                        break;
                    }
                    in_block = true;
                    document.name = Some(name);
                }
                Token::SaveFrame => {}
                Token::Tag(tag) => match tokens.next() {
                    Some(Spanned {
                        token: Token::Value(value),
                        ..
                    }) => document.push_item(&tag, value, line)?,
                    _ => return Err(syntax(line, CifSyntaxErrorKind::MissingValue(tag))),
                },
                Token::Loop => {
                    let mut tags = Vec::new();
                    while let Some(Spanned {
                        token: Token::Tag(tag),
                        ..
                    }) = tokens.next_if(|s| matches!(s.token, Token::Tag(_)))
                    {
                        tags.push(tag);
                    }
                    let mut values = Vec::new();
                    while let Some(Spanned {
                        token: Token::Value(value),
                        ..
                    }) = tokens.next_if(|s| matches!(s.token, Token::Value(_)))
                    {
                        values.push(value);
                    }
                    document.push_loop(&tags, values, line)?;
                }
                Token::Value(value) => {
                    return Err(syntax(line, CifSyntaxErrorKind::DanglingValue(value)));
                }
            }
        }

        Ok(document)
    }

    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    pub fn category(&self, name: &str) -> Option<&Category> {
        self.categories.get(name)
    }

    pub fn require(&self, name: &str) -> Result<&Category, CifError> {
        self.category(name)
            .ok_or_else(|| CifError::MissingCategory(name.to_string()))
    }

    fn push_item(&mut self, tag: &str, value: String, line: usize) -> Result<(), CifError> {
        let (category_name, item) = split_tag(tag);
        let category = self.categories.entry(category_name.clone()).or_default();
        if category.looped {
            return Err(syntax(line, CifSyntaxErrorKind::MixedForm(category_name)));
        }
        if category.columns.iter().any(|c| c == &item) {
            return Err(syntax(line, CifSyntaxErrorKind::DuplicateItem(tag.to_string())));
        }
        if category.rows.is_empty() {
            category.rows.push(Vec::new());
        }
        category.columns.push(item);
        category.rows[0].push(value);
        Ok(())
    }

    fn push_loop(&mut self, tags: &[String], values: Vec<String>, line: usize) -> Result<(), CifError> {
        let Some(first) = tags.first() else {
            return Err(syntax(line, CifSyntaxErrorKind::EmptyLoop));
        };
        let (category_name, _) = split_tag(first);

        let mut columns = Vec::with_capacity(tags.len());
        for tag in tags {
            let (other, item) = split_tag(tag);
            if other != category_name {
                return Err(syntax(
                    line,
                    CifSyntaxErrorKind::MixedLoop {
                        first: category_name,
                        other,
                    },
                ));
            }
            columns.push(item);
        }

        if values.len() % columns.len() != 0 {
            return Err(syntax(
                line,
                CifSyntaxErrorKind::RaggedLoop {
                    category: category_name,
                    values: values.len(),
                    columns: columns.len(),
                },
            ));
        }
        match self.categories.get(&category_name) {
            Some(existing) if existing.looped => {
                return Err(syntax(line, CifSyntaxErrorKind::DuplicateItem(first.clone())));
            }
            Some(_) => return Err(syntax(line, CifSyntaxErrorKind::MixedForm(category_name))),
            None => {}
        }

        let rows = values
            .chunks(columns.len())
            .map(|chunk| chunk.to_vec())
            .collect();
        self.categories.insert(
            category_name,
            Category {
                columns,
                rows,
                looped: true,
            },
        );
        Ok(())
    }
}

impl Category {
    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    fn column_index(&self, item: &str) -> Option<usize> {
        self.columns.iter().position(|c| c == item)
    }

    /// Values of one item in row order.
    pub fn column(&self, item: &str) -> Option<Vec<&str>> {
        let index = self.column_index(item)?;
        self.rows
            .iter()
            .map(|row| row.get(index).map(String::as_str))
            .collect()
    }

    /// Value of an item in the first row.
    pub fn value(&self, item: &str) -> Option<&str> {
        let index = self.column_index(item)?;
        self.rows.first()?.get(index).map(String::as_str)
    }
}

fn split_tag(tag: &str) -> (String, String) {
    let bare = tag.trim_start_matches('_');
    match bare.split_once('.') {
        Some((category, item)) => (category.to_string(), item.to_string()),
        None => (bare.to_string(), String::new()),
    }
}

fn tokenize(text: &str) -> Result<Vec<Spanned>, CifError> {
    let mut tokens = Vec::new();
    let mut lines = text.lines().enumerate();

    while let Some((index, line)) = lines.next() {
        let line_num = index + 1;
        let Some(first) = line.strip_prefix(';') else {
            tokenize_line(line, line_num, &mut tokens)?;
            continue;
        };

        let mut parts: Vec<&str> = Vec::new();
        if !first.trim().is_empty() {
            parts.push(first);
        }
        let mut closing = None;
        for (next_index, next) in lines.by_ref() {
            if let Some(rest) = next.strip_prefix(';') {
                closing = Some((next_index + 1, rest));
                break;
            }
            parts.push(next);
        }
        let Some((closing_line, rest)) = closing else {
            return Err(syntax(line_num, CifSyntaxErrorKind::UnterminatedTextField));
        };

        tokens.push(Spanned {
            token: Token::Value(parts.join("\n")),
            line: line_num,
        });
        tokenize_line(rest, closing_line, &mut tokens)?;
    }

    Ok(tokens)
}

fn tokenize_line(line: &str, line_num: usize, tokens: &mut Vec<Spanned>) -> Result<(), CifError> {
    let bytes = line.as_bytes();
    let mut i = 0;

    while i < bytes.len() {
        let b = bytes[i];
        if b.is_ascii_whitespace() {
            i += 1;
            continue;
        }
        if b == b'#' {
            break;
        }

        if b == b'\'' || b == b'"' {
            // a quote only closes when followed by whitespace or the end of the line
            let start = i + 1;
            let mut j = start;
            let end = loop {
                if j >= bytes.len() {
                    return Err(syntax(line_num, CifSyntaxErrorKind::UnterminatedQuote));
                }
                if bytes[j] == b && bytes.get(j + 1).is_none_or(|n| n.is_ascii_whitespace()) {
                    break j;
                }
                j += 1;
            };
            tokens.push(Spanned {
                token: Token::Value(line[start..end].to_string()),
                line: line_num,
            });
            i = end + 1;
            continue;
        }

        let start = i;
        while i < bytes.len() && !bytes[i].is_ascii_whitespace() {
            i += 1;
        }
        tokens.push(Spanned {
            token: classify(&line[start..i]),
            line: line_num,
        });
    }

    Ok(())
}

fn classify(word: &str) -> Token {
    if word.starts_with('_') {
        return Token::Tag(word.to_string());
    }
    let lower = word.to_ascii_lowercase();
    if lower == "loop_" {
        Token::Loop
    } else if lower.starts_with("data_") {
        Token::DataBlock(word[5..].to_string())
    } else if lower.starts_with("save_") {
        Token::SaveFrame
    } else {
        Token::Value(word.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = "\
data_AF-P00000-F1
#
_entry.id AF-P00000-F1
_struct.title 'Model of a test protein'
#
_entity_poly.entity_id 1
_entity_poly.type polypeptide(L)
_entity_poly.pdbx_seq_one_letter_code
;MSTK
RSAA
;
_entity_poly.nstd_monomer no
#
loop_
_ma_qa_metric_local.label_asym_id
_ma_qa_metric_local.label_comp_id
_ma_qa_metric_local.label_seq_id
_ma_qa_metric_local.metric_id
_ma_qa_metric_local.metric_value
A MET 1 2 45.12
A SER 2 2 61.80
A THR 3 2 \"88.0\"
#
";

    #[test]
    fn parses_single_items_and_text_fields() {
        let doc = CifDocument::parse(SAMPLE).unwrap();
        assert_eq!(doc.name(), Some("AF-P00000-F1"));

        let entry = doc.require("entry").unwrap();
        assert_eq!(entry.value("id"), Some("AF-P00000-F1"));

        let title = doc.require("struct").unwrap();
        assert_eq!(title.value("title"), Some("Model of a test protein"));

        let poly = doc.require("entity_poly").unwrap();
        assert_eq!(poly.len(), 1);
        assert_eq!(poly.value("pdbx_seq_one_letter_code"), Some("MSTK\nRSAA"));
        assert_eq!(poly.value("nstd_monomer"), Some("no"));
    }

    #[test]
    fn parses_loops_in_row_order() {
        let doc = CifDocument::parse(SAMPLE).unwrap();
        let metrics = doc.require("ma_qa_metric_local").unwrap();

        assert_eq!(metrics.len(), 3);
        assert_eq!(metrics.columns().len(), 5);
        assert_eq!(
            metrics.column("metric_value"),
            Some(vec!["45.12", "61.80", "88.0"])
        );
        assert_eq!(metrics.column("label_comp_id").unwrap()[1], "SER");
    }

    #[test]
    fn missing_category_is_reported() {
        let doc = CifDocument::parse(SAMPLE).unwrap();
        assert_eq!(
            doc.require("atom_site"),
            Err(CifError::MissingCategory("atom_site".to_string()))
        );
        assert!(doc.require("entry").unwrap().column("absent").is_none());
    }

    #[test]
    fn quote_inside_word_does_not_close_value() {
        let doc = CifDocument::parse("data_x\n_atom.name \"O5'\"\n_atom.alt 'it's here'\n").unwrap();
        let atom = doc.require("atom").unwrap();
        assert_eq!(atom.value("name"), Some("O5'"));
        assert_eq!(atom.value("alt"), Some("it's here"));
    }

    #[test]
    fn comments_are_ignored() {
        let doc = CifDocument::parse("data_x # header\n_a.b 1 # trailing\n# full line\n").unwrap();
        assert_eq!(doc.require("a").unwrap().value("b"), Some("1"));
    }

    #[test]
    fn only_the_first_data_block_is_read() {
        let doc = CifDocument::parse("data_one\n_a.b 1\ndata_two\n_c.d 2\n").unwrap();
        assert_eq!(doc.name(), Some("one"));
        assert!(doc.category("c").is_none());
    }

    #[test]
    fn unterminated_text_field_is_an_error() {
        let result = CifDocument::parse("data_x\n_a.b\n;never closed\n");
        assert_eq!(
            result,
            Err(CifError::Syntax {
                line: 3,
                kind: CifSyntaxErrorKind::UnterminatedTextField
            })
        );
    }

    #[test]
    fn unterminated_quote_is_an_error() {
        let result = CifDocument::parse("data_x\n_a.b 'open\n");
        assert!(matches!(
            result,
            Err(CifError::Syntax {
                line: 2,
                kind: CifSyntaxErrorKind::UnterminatedQuote
            })
        ));
    }

    #[test]
    fn tag_without_value_is_an_error() {
        let result = CifDocument::parse("data_x\n_a.b\n_a.c 1\n");
        assert!(matches!(
            result,
            Err(CifError::Syntax {
                kind: CifSyntaxErrorKind::MissingValue(_),
                ..
            })
        ));
    }

    #[test]
    fn ragged_loop_is_an_error() {
        let result = CifDocument::parse("data_x\nloop_\n_a.b\n_a.c\n1 2 3\n");
        assert!(matches!(
            result,
            Err(CifError::Syntax {
                kind: CifSyntaxErrorKind::RaggedLoop {
                    values: 3,
                    columns: 2,
                    ..
                },
                ..
            })
        ));
    }

    #[test]
    fn loop_mixing_categories_is_an_error() {
        let result = CifDocument::parse("data_x\nloop_\n_a.b\n_z.c\n1 2\n");
        assert!(matches!(
            result,
            Err(CifError::Syntax {
                kind: CifSyntaxErrorKind::MixedLoop { .. },
                ..
            })
        ));
    }

    #[test]
    fn dangling_value_is_an_error() {
        let result = CifDocument::parse("data_x\n_a.b 1 2\n");
        assert!(matches!(
            result,
            Err(CifError::Syntax {
                kind: CifSyntaxErrorKind::DanglingValue(_),
                ..
            })
        ));
    }

    #[test]
    fn single_item_after_empty_loop_is_an_error() {
        let text = "data_x\nloop_\n_m.seq_id\n_m.value\nloop_\n_other.a\nz\n_m.model_id 1\n";
        assert_eq!(
            CifDocument::parse(text),
            Err(CifError::Syntax {
                line: 8,
                kind: CifSyntaxErrorKind::MixedForm("m".to_string())
            })
        );
    }

    #[test]
    fn loop_after_single_items_is_an_error() {
        let result = CifDocument::parse("data_x\n_a.b 1\nloop_\n_a.c\n2\n3\n");
        assert!(matches!(
            result,
            Err(CifError::Syntax {
                kind: CifSyntaxErrorKind::MixedForm(_),
                ..
            })
        ));
    }

    #[test]
    fn repeated_loop_is_a_duplicate() {
        let result = CifDocument::parse("data_x\nloop_\n_a.b\n1\nloop_\n_a.b\n2\n");
        assert!(matches!(
            result,
            Err(CifError::Syntax {
                kind: CifSyntaxErrorKind::DuplicateItem(_),
                ..
            })
        ));
    }

    #[test]
    fn empty_loop_has_a_column_without_values() {
        let doc = CifDocument::parse("data_x\nloop_\n_a.b\n_a.c\n").unwrap();
        let category = doc.require("a").unwrap();
        assert!(category.is_empty());
        assert_eq!(category.column("c"), Some(Vec::new()));
        assert_eq!(category.value("c"), None);
    }
}
