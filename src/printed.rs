//! Plain-text rendering of instances and matchings.
//!
//! ## Layout
//!
//! ```text
//! 0 1 2             0 1 2
//! 0 1 2 | 0/-   0 | 0 1 2
//! 0 1 2 | 1/-   1 | 0 2 1
//! 0 2 1 | 2/-   2 | 1 0 2
//! ```
//!
//! Each line shows side-A agent `i`'s list, `i` itself, side-B agent `i` and
//! its list. For a matching, line `i` pairs `i` with its partner `j`: the part
//! of `i`'s list it was rejected from is blanked, and so is the part of `j`'s
//! list no proposal ever reached.
//!
//! With letters, side A is `A B C ...` and side B ends at `z`.

use crate::types::{Instance, Matching, Side};

/// Renderer bound to one instance.
#[derive(Debug, Clone, Copy)]
pub struct PrintedInstance<'a> {
    instance: &'a Instance,
    use_letters: bool,
}

impl<'a> PrintedInstance<'a> {
    /// Numeric renderer
    pub fn new(instance: &'a Instance) -> Self {
        Self {
            instance,
            use_letters: false,
        }
    }

    /// Switch between letters and indices
    pub fn with_letters(mut self, use_letters: bool) -> Self {
        self.use_letters = use_letters;
        self
    }

    fn label(&self, side: Side, agent: usize) -> String {
        if self.use_letters {
            side.letter(agent, self.instance.size()).to_string()
        } else {
            agent.to_string()
        }
    }

    fn axis(&self) -> String {
        let axis = (0..self.instance.size())
            .map(|i| i.to_string())
            .collect::<Vec<_>>()
            .join(" ");
        format!("{axis}             {axis}\n")
    }

    /// Preference row of `agent` on `side`, keeping only ranks `shown` accepts.
    fn row(&self, side: Side, agent: usize, shown: impl Fn(usize) -> bool) -> String {
        self.instance
            .prefs(side, agent)
            .iter()
            .enumerate()
            .map(|(rank, &other)| {
                if shown(rank) {
                    self.label(side.opposite(), other)
                } else {
                    " ".to_string()
                }
            })
            .collect::<Vec<_>>()
            .join(" ")
    }

    /// Both sides' full preference lists.
    pub fn print(&self) -> String {
        let mut result = self.axis();
        for i in 0..self.instance.size() {
            result += &format!(
                "{} | {}/-   {} | {}\n",
                self.row(Side::A, i, |_| true),
                self.label(Side::A, i),
                self.label(Side::B, i),
                self.row(Side::B, i, |_| true),
            );
        }
        result
    }

    /// The instance annotated with `matching`.
    ///
    /// A matching of another size shows every agent unpaired.
    pub fn print_matching(&self, matching: &Matching) -> String {
        let fits = matching.size() == self.instance.size();
        let mut result = self.axis();
        for i in 0..self.instance.size() {
            let proposed = if fits { matching.rank_a()[i] } else { 0 };
            let prefs_a = self.row(Side::A, i, |rank| rank >= proposed);
            let paired = if fits { matching.partner_a(i) } else { None };
            let (partner, prefs_b) = match paired {
                Some(j) => {
                    let held = matching.rank_b()[j];
                    let row = self.row(Side::B, j, |rank| held.is_some_and(|h| rank <= h));
                    (self.label(Side::B, j), row)
                }
                None => ("-".to_string(), String::new()),
            };
            result += &format!(
                "{} | {} --- {} | {}\n",
                prefs_a,
                self.label(Side::A, i),
                partner,
                prefs_b,
            );
        }
        result
    }

    /// Every matching in `matchings`, best total score first.
    pub fn print_ranked(&self, matchings: &[Matching]) -> String {
        let mut ranked: Vec<&Matching> = matchings.iter().collect();
        ranked.sort_by_key(|m| m.total_score());
        ranked
            .into_iter()
            .map(|m| format!("{}{}\n", self.print_matching(m), summary(m)))
            .collect::<Vec<_>>()
            .join("\n")
    }
}

/// `"A: <score_a>, B: <score_b>, total: <total>"`
pub fn summary(matching: &Matching) -> String {
    format!(
        "A: {}, B: {}, total: {}",
        matching.score_a(),
        matching.score_b(),
        matching.total_score()
    )
}
