//! Word lists for the autocorrect world.

use std::collections::HashSet;
use std::io::BufRead;
use std::path::Path;

use super::WorldError;

/// Common English words, enough for short demos without a word file.
const BUILTIN: &str = "
a about above after again against all almost also always am an and animal
another answer any are area around as ask at away back be bear beautiful
became because become bed been before began begin behind being below best
better between big bird birthday black blue board boat body book both box
boy bread bring brother brown build but by call came can car care carry cat
cause change child children city class clear close cold color come common
complete could country course cut dark day did different do does dog done
door down draw dream during each early earth eat end enough even ever every
example eye face fact fall family far farm fast father feel feet few field
find fine fire first fish five fly follow food foot for form found four free
friend from front full game gave get girl give go gold good got great green
ground group grow had half hand happy hard has have he head hear heard heart
help her here high him his hold home horse hot hour house how i idea if in
inside into is island it its just keep kind king knew know land large last
late laugh learn leave left less let letter life light like line list listen
little live long look love low made make man many map mark may me mean men
might mile mind miss money moon more morning most mother mountain move much
music must my name near need never new next night no north not note nothing
now number of off often old on once one only open or order other our out
over own page paper part party pass people person picture piece place plan
plant play point present problem pull put question quick rain ran read ready
real red remember rest right river road rock room round run said same saw
say school sea second see seem sentence set several shape she ship short
should show side simple since sing sister sit six size sleep slow small snow
so some something song soon sound south space speak special spell stand star
start state stay step still stop story street strong study such sun sure
table tail take talk teacher tell ten than that the their them then there
these they thing think this those thought three through time to today
together told too took top toward town tree true try turn two under until up
upon us use very voice walk want warm was watch water way we week well went
were west what when where which while white who whole why will wind window
winter with without wonder word work world would write year yes yet you
young your
";

/// Set of lowercase words. Single letters other than `a` and `i` are never
/// members, so a one-letter string is not a trivial goal.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Lexicon {
    words: HashSet<String>,
}

impl Lexicon {
    /// The built-in list.
    #[must_use]
    pub fn builtin() -> Self {
        Self::from_words(BUILTIN.split_whitespace())
    }

    /// Build from any word iterator. Words are trimmed and lowercased;
    /// blanks and excluded single letters are dropped.
    pub fn from_words<I, S>(words: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let words = words
            .into_iter()
            .map(|w| w.as_ref().trim().to_lowercase())
            .filter(|w| admissible(w))
            .collect();
        Self { words }
    }

    /// Load one word per line.
    ///
    /// # Errors
    ///
    /// Returns [`WorldError::Lexicon`] on any read failure.
    pub fn from_file(path: &Path) -> Result<Self, WorldError> {
        let file = std::fs::File::open(path)?;
        let lines = std::io::BufReader::new(file)
            .lines()
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self::from_words(lines))
    }

    /// Case-insensitive membership.
    #[must_use]
    pub fn contains(&self, word: &str) -> bool {
        self.words.contains(&word.to_lowercase())
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.words.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }
}

fn admissible(word: &str) -> bool {
    let mut chars = word.chars();
    match (chars.next(), chars.next()) {
        (None, _) => false,
        (Some(c), None) => c == 'a' || c == 'i',
        _ => true,
    }
}
