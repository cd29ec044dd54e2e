use std::fmt;

use unicode_width::UnicodeWidthStr;

use crate::cohesion::ArgumentQuery;
use crate::props::DepType;
use crate::units::{BasePhraseRef, DependencyUnit, MorphemeRef};

/// One-letter part-of-speech marks appended to each morpheme when `show_pos` is set.
fn pos_mark(morpheme: &MorphemeRef<'_>) -> &'static str {
    let key = match morpheme.subpos.as_str() {
        "固有名詞" | "人名" | "地名" => morpheme.subpos.as_str(),
        _ => morpheme.pos.as_str(),
    };
    match key {
        "特殊" => "*",
        "動詞" => "v",
        "形容詞" => "j",
        "判定詞" => "c",
        "助動詞" => "x",
        "名詞" => "n",
        "固有名詞" => "N",
        "人名" => "J",
        "地名" => "C",
        "組織名" => "A",
        "指示詞" => "d",
        "副詞" => "a",
        "助詞" => "p",
        "接続詞" => "c",
        "連体詞" => "m",
        "感動詞" => "!",
        "接頭辞" => "p",
        "接尾辞" => "s",
        "未定義語" => "?",
        _ => "",
    }
}

/// Whether a column carries no line, a light line or a heavy (parallel) line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Column {
    Empty,
    Light,
    Heavy,
}

/// The horizontal run drawn to the left of a cell.
fn extend_horizontal(cell: &str) -> &'static str {
    match cell {
        "╂" | "┼" | "┤" | "┨" | "┐" | "─" | "I" | "A" => "─",
        "╋" | "┿" | "━" | "P" => "━",
        _ => " ",
    }
}

/// Fill the cells right of each leaf, following its dependency edge.
fn draw_cells(edges: &[(i64, Option<DepType>)]) -> Vec<Vec<&'static str>> {
    let n = edges.len();
    let mut cells = vec![vec![""; n]; n];
    let mut active = vec![Column::Empty; n];
    for i in 0..n.saturating_sub(1) {
        let (parent, dep_type) = edges[i];
        let para_row = dep_type == Some(DepType::Parallel);
        for j in (i + 1)..n {
            let column = j as i64;
            cells[i][j] = if column < parent {
                match (active[j], para_row) {
                    (Column::Heavy, true) => "╋",
                    (Column::Heavy, false) => "╂",
                    (Column::Light, true) => "┿",
                    (Column::Light, false) => "┼",
                    (Column::Empty, true) => "━",
                    (Column::Empty, false) => "─",
                }
            } else if column == parent {
                let cell = match dep_type {
                    Some(DepType::Parallel) => "P",
                    Some(DepType::ImperfectParallel) => "I",
                    Some(DepType::Apposition) => "A",
                    _ => match active[j] {
                        Column::Heavy => "┨",
                        Column::Light => "┤",
                        Column::Empty => "┐",
                    },
                };
                if active[j] != Column::Heavy {
                    active[j] = if para_row { Column::Heavy } else { Column::Light };
                }
                cell
            } else {
                match active[j] {
                    Column::Heavy => "┃",
                    Column::Light => "│",
                    Column::Empty => " ",
                }
            };
        }
    }
    cells
}

/// Right-aligned dependency tree of phrases or base phrases.
///
/// ```text
///  望遠n鏡nでp─────┐
///   泳いでvいるs─┐ │
///         少女nをp─┤
///           見たv。*
/// ```
pub struct TreeDisplay<'a, L> {
    leaves: Vec<L>,
    show_pos: bool,
    annotations: Vec<String>,
    _marker: std::marker::PhantomData<&'a ()>,
}

impl<'a, L: DependencyUnit<'a>> TreeDisplay<'a, L> {
    pub fn new(leaves: Vec<L>) -> Self {
        let annotations = vec![String::new(); leaves.len()];
        TreeDisplay {
            leaves,
            show_pos: false,
            annotations,
            _marker: std::marker::PhantomData,
        }
    }

    pub fn with_pos(mut self) -> Self {
        self.show_pos = true;
        self
    }

    fn leaf_string(&self, leaf: &L) -> String {
        let mut out = String::new();
        for morpheme in leaf.morphemes() {
            out.push_str(&morpheme.surface);
            if self.show_pos {
                out.push_str(pos_mark(&morpheme));
            }
        }
        out
    }

    fn annotate(&mut self, annotate: impl Fn(&L) -> Vec<String>) {
        for (leaf, annotation) in self.leaves.iter().zip(self.annotations.iter_mut()) {
            for tag in annotate(leaf) {
                if annotation.split(' ').any(|existing| existing == tag) {
                    continue;
                }
                if !annotation.is_empty() {
                    annotation.push(' ');
                }
                annotation.push_str(&tag);
            }
        }
    }
}

impl<'a> TreeDisplay<'a, BasePhraseRef<'a>> {
    /// Show `type:target` for every rel tag.
    pub fn with_rel(mut self) -> Self {
        self.annotate(|bp| {
            bp.rel_tags
                .iter()
                .map(|tag| format!("{}:{}", tag.rel_type, tag.target))
                .collect()
        });
        self
    }

    /// Show `case:argument` for every PAS argument, without coreference expansion.
    pub fn with_pas(mut self) -> Self {
        self.annotate(|bp| {
            let pas = match bp.pas() {
                Some(pas) => pas,
                None => return Vec::new(),
            };
            let query = ArgumentQuery::default().with_relax(false);
            let mut tags = Vec::new();
            for case in pas.cases() {
                for argument in bp.get_arguments(case, query) {
                    let text = match (argument.as_exophora(), bp.argument_base_phrase(&argument)) {
                        (Some(exophora), _) => exophora.to_string(),
                        (None, Some(target)) => core_text(&target),
                        (None, None) => continue,
                    };
                    tags.push(format!("{}:{}", case, text));
                }
            }
            tags
        });
        self
    }
}

/// Base phrase text without leading and trailing particles, punctuation and copulas.
fn core_text(base_phrase: &BasePhraseRef<'_>) -> String {
    let morphemes = base_phrase.morphemes();
    let ancillary = |m: &MorphemeRef<'_>| matches!(m.pos.as_str(), "助詞" | "特殊" | "判定詞");
    let start = morphemes
        .iter()
        .position(|m| !ancillary(m))
        .unwrap_or(morphemes.len());
    let end = morphemes
        .iter()
        .rposition(|m| !ancillary(m))
        .map_or(start, |i| i + 1);
    let core = if start < end {
        &morphemes[start..end]
    } else {
        &morphemes[..]
    };
    core.iter().map(|m| m.surface.as_str()).collect()
}

impl<'a, L: DependencyUnit<'a>> fmt::Display for TreeDisplay<'a, L> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let edges: Vec<(i64, Option<DepType>)> = self
            .leaves
            .iter()
            .map(|leaf| (i64::from(leaf.parent_index().unwrap_or(-1)), leaf.dep_type()))
            .collect();
        let cells = draw_cells(&edges);

        let lines: Vec<String> = self
            .leaves
            .iter()
            .enumerate()
            .map(|(i, leaf)| {
                let mut line = self.leaf_string(leaf);
                for cell in &cells[i][(i + 1)..] {
                    line.push_str(extend_horizontal(cell));
                    line.push_str(cell);
                }
                line
            })
            .collect();

        let max_width = lines.iter().map(|line| line.width()).max().unwrap_or(0);
        for (line, annotation) in lines.iter().zip(&self.annotations) {
            let mut row = " ".repeat(max_width - line.width());
            row.push_str(line);
            if !annotation.is_empty() {
                row.push_str("  ");
                row.push_str(annotation);
            }
            writeln!(f, "{}", row.trim_end())?;
        }
        Ok(())
    }
}

/// Render the dependency tree of `leaves` with part-of-speech marks.
pub fn sprint_tree<'a, L: DependencyUnit<'a>>(leaves: Vec<L>) -> String {
    TreeDisplay::new(leaves).with_pos().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::units::Sentence;

    const KNP: &str = r#"# S-ID:000-0-0 kwja:1.2.2
* 3D
+ 1D <体言>
望遠 ぼうえん 望遠 名詞 6 普通名詞 1 * 0 * 0 "代表表記:望遠/ぼうえん カテゴリ:抽象物" <基本句-主辞>
+ 4D <体言>
鏡 きょう 鏡 名詞 6 普通名詞 1 * 0 * 0 "代表表記:鏡/きょう 漢字読み:音 カテゴリ:人工物-その他" <基本句-主辞>
で で で 助詞 9 格助詞 1 * 0 * 0 "代表表記:で/で"
* 2D
+ 3D <rel type="ガ" target="少女" sid="000-0-0" id="3"/><用言:動><時制:非過去><レベル:B><動態述語><節-区切:連体修飾><節-主辞>
泳いで およいで 泳ぐ 動詞 2 * 0 子音動詞ガ行 4 タ系連用テ形 14 "代表表記:泳ぐ/およぐ" <基本句-主辞><用言表記先頭>
いる いる いる 接尾辞 14 動詞性接尾辞 7 母音動詞 1 基本形 2 "代表表記:いる/いる" <用言表記末尾>
* 3D
+ 4D <体言><SM-主体>
少女 しょうじょ 少女 名詞 6 普通名詞 1 * 0 * 0 "代表表記:少女/しょうじょ カテゴリ:人" <基本句-主辞>
を を を 助詞 9 格助詞 1 * 0 * 0 "代表表記:を/を"
* -1D
+ -1D <rel type="ガ" target="著者"/><rel type="ヲ" target="少女" sid="000-0-0" id="3"/><用言:動><時制:過去><レベル:C><動態述語><節-区切><節-主辞>
見た みた 見る 動詞 2 * 0 母音動詞 1 タ形 10 "代表表記:見る/みる 補文ト 自他動詞:自:見える/みえる" <基本句-主辞><用言表記先頭><用言表記末尾>
。 。 。 特殊 1 句点 1 * 0 * 0 "代表表記:。/。"
EOS
"#;

    #[test]
    fn test_phrase_tree() {
        let sentence = Sentence::from_knp(KNP).unwrap();
        let tree = sprint_tree(sentence.phrases().unwrap());
        insta::assert_snapshot!(tree, @r###"
        望遠n鏡nでp─────┐
         泳いでvいるs─┐ │
               少女nをp─┤
                 見たv。*
        "###);
    }

    #[test]
    fn test_base_phrase_tree_with_rel() {
        let sentence = Sentence::from_knp(KNP).unwrap();
        let tree = TreeDisplay::new(sentence.base_phrases().unwrap())
            .with_pos()
            .with_rel()
            .to_string();
        let lines: Vec<&str> = tree.lines().collect();
        assert_eq!(
            lines,
            vec![
                "   望遠n─┐",
                "    鏡nでp─────┐",
                "泳いでvいるs─┐ │  ガ:少女",
                "      少女nをp─┤",
                "        見たv。*  ガ:著者 ヲ:少女",
            ]
        );
    }

    #[test]
    fn test_base_phrase_tree_with_pas() {
        let sentence = Sentence::from_knp(KNP).unwrap();
        let tree = TreeDisplay::new(sentence.base_phrases().unwrap())
            .with_pas()
            .to_string();
        let last = tree.lines().last().unwrap();
        assert_eq!(last, "        見た。  ガ:著者 ヲ:少女");
    }

    #[test]
    fn test_parallel_cells() {
        let cells = draw_cells(&[
            (2, Some(DepType::Parallel)),
            (2, Some(DepType::Dependency)),
            (-1, Some(DepType::Dependency)),
        ]);
        assert_eq!(cells[0][1], "━");
        assert_eq!(cells[0][2], "P");
        assert_eq!(cells[1][2], "┨");
    }
}
