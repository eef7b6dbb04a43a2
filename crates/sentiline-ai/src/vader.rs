//! Rule-based polarity scoring (VADER), following NLTK's
//! `SentimentIntensityAnalyzer`.
//!
//! Each token gets a valence from the lexicon, adjusted by the rules around
//! it: booster and dampener words, ALL-CAPS emphasis, negation within three
//! tokens, a contrastive "but", idioms, and trailing `!`/`?` emphasis. The
//! summed valence is squashed into a compound score in `[-1, 1]`; the positive,
//! negative and neutral shares come from the per-token valences.

use sentiline_core::PolarityScores;

use crate::lexicon::Lexicon;

/// Anything that turns text into polarity scores.
pub trait PolarityScorer {
    fn polarity_scores(&self, text: &str) -> PolarityScores;
}

impl<S: PolarityScorer + ?Sized> PolarityScorer for &S {
    fn polarity_scores(&self, text: &str) -> PolarityScores {
        (**self).polarity_scores(text)
    }
}

impl<S: PolarityScorer + ?Sized> PolarityScorer for Box<S> {
    fn polarity_scores(&self, text: &str) -> PolarityScores {
        (**self).polarity_scores(text)
    }
}

// ── Empirically derived constants ──

/// Intensity added by a booster word.
const B_INCR: f64 = 0.293;
/// Intensity removed by a dampener word.
const B_DECR: f64 = -0.293;
/// Emphasis for a sentiment word in ALL CAPS among mixed-case text.
const C_INCR: f64 = 0.733;
/// Scale applied to a negated valence.
const N_SCALAR: f64 = -0.74;
/// Normalisation constant: approximates the maximum expected sum.
const ALPHA: f64 = 15.0;

const EXCLAMATION_WEIGHT: f64 = 0.292;
const MAX_EXCLAMATIONS: usize = 4;
const QUESTION_WEIGHT: f64 = 0.18;
const MAX_QUESTION_EMPHASIS: f64 = 0.96;

const NEGATIONS: &[&str] = &[
    "aint", "arent", "cannot", "cant", "couldnt", "darent", "didnt", "doesnt", "ain't", "aren't",
    "can't", "couldn't", "daren't", "didn't", "doesn't", "dont", "hadnt", "hasnt", "havent",
    "isnt", "mightnt", "mustnt", "neither", "don't", "hadn't", "hasn't", "haven't", "isn't",
    "mightn't", "mustn't", "neednt", "needn't", "never", "none", "nope", "nor", "not", "nothing",
    "nowhere", "oughtnt", "shant", "shouldnt", "uhuh", "wasnt", "werent", "oughtn't", "shan't",
    "shouldn't", "uh-uh", "wasn't", "weren't", "without", "wont", "wouldnt", "won't", "wouldn't",
    "rarely", "seldom", "despite",
];

/// Punctuation that is dropped when it sits directly before or after a word.
const PUNCTUATION: &[&str] = &[
    ".", "!", "?", ",", ";", ":", "-", "'", "\"", "!!", "!!!", "??", "???", "?!?", "!?!", "?!?!",
    "!?!?", "?!?!?", "!?!?!",
];

fn booster(word: &str) -> Option<f64> {
    match word {
        "absolutely" | "amazingly" | "awfully" | "completely" | "considerably" | "decidedly"
        | "deeply" | "effing" | "enormously" | "entirely" | "especially" | "exceptionally"
        | "extremely" | "fabulously" | "flipping" | "flippin" | "fricking" | "frickin"
        | "frigging" | "friggin" | "fully" | "fucking" | "greatly" | "hella" | "highly"
        | "hugely" | "incredibly" | "intensely" | "majorly" | "more" | "most" | "particularly"
        | "purely" | "quite" | "really" | "remarkably" | "so" | "substantially" | "thoroughly"
        | "totally" | "tremendously" | "uber" | "unbelievably" | "unusually" | "utterly"
        | "very" => Some(B_INCR),
        "almost" | "barely" | "hardly" | "just enough" | "kind of" | "kinda" | "kindof"
        | "kind-of" | "less" | "little" | "marginally" | "occasionally" | "partly"
        | "scarcely" | "slightly" | "somewhat" | "sort of" | "sorta" | "sortof" | "sort-of" => {
            Some(B_DECR)
        }
        _ => None,
    }
}

/// Idioms whose valence replaces that of the lexicon word inside them.
fn special_case(phrase: &str) -> Option<f64> {
    match phrase {
        "the shit" | "the bomb" => Some(3.0),
        "bad ass" => Some(1.5),
        "yeah right" => Some(-2.0),
        "cut the mustard" => Some(2.0),
        "kiss of death" => Some(-1.5),
        "hand to mouth" => Some(-2.0),
        _ => None,
    }
}

/// VADER scorer over a [`Lexicon`].
#[derive(Debug, Default)]
pub struct VaderScorer {
    lexicon: Lexicon,
}

impl VaderScorer {
    pub fn new(lexicon: Lexicon) -> Self {
        Self { lexicon }
    }

    pub fn lexicon(&self) -> &Lexicon {
        &self.lexicon
    }

    fn in_lexicon(&self, token: &str) -> bool {
        self.lexicon.contains(&token.to_lowercase())
    }

    /// Valence of the token at `i` after all local rules are applied.
    fn token_valence(&self, text: &SentiText<'_>, i: usize) -> f64 {
        let tokens = &text.tokens;
        let Some(mut valence) = self.lexicon.valence(&tokens[i].to_lowercase()) else {
            return 0.0;
        };

        if text.cap_differential && is_upper(tokens[i]) {
            if valence > 0.0 {
                valence += C_INCR;
            } else {
                valence -= C_INCR;
            }
        }

        for start_i in 0..3 {
            if i > start_i && !self.in_lexicon(tokens[i - (start_i + 1)]) {
                let mut scalar =
                    scalar_inc_dec(tokens[i - (start_i + 1)], valence, text.cap_differential);
                // Boosters further away have less effect.
                if start_i == 1 {
                    scalar *= 0.95;
                } else if start_i == 2 {
                    scalar *= 0.9;
                }
                valence += scalar;
                valence = never_check(valence, tokens, start_i, i);
                if start_i == 2 {
                    valence = idioms_check(valence, tokens, i);
                }
            }
        }

        self.least_check(valence, tokens, i)
    }

    /// "least" before a word flips it, except in "at least" and "very least".
    fn least_check(&self, valence: f64, tokens: &[&str], i: usize) -> f64 {
        let lower = |back: usize| tokens[i - back].to_lowercase();
        if i > 1 && !self.in_lexicon(tokens[i - 1]) && lower(1) == "least" {
            if lower(2) != "at" && lower(2) != "very" {
                return valence * N_SCALAR;
            }
        } else if i > 0 && !self.in_lexicon(tokens[i - 1]) && lower(1) == "least" {
            return valence * N_SCALAR;
        }
        valence
    }
}

impl PolarityScorer for VaderScorer {
    fn polarity_scores(&self, text: &str) -> PolarityScores {
        let senti = SentiText::new(text);
        let tokens = &senti.tokens;

        let mut sentiments = Vec::with_capacity(tokens.len());
        for (pos, token) in tokens.iter().enumerate() {
            // Context is read around the first occurrence of an identical token.
            let i = tokens.iter().position(|t| t == token).unwrap_or(pos);
            let lower = token.to_lowercase();
            // Boosters and "kind of" carry no valence of their own.
            if booster(&lower).is_some()
                || (lower == "kind" && i + 1 < tokens.len() && tokens[i + 1].to_lowercase() == "of")
            {
                sentiments.push(0.0);
                continue;
            }
            sentiments.push(self.token_valence(&senti, i));
        }

        but_check(tokens, &mut sentiments);
        score_valence(&sentiments, text)
    }
}

/// Tokenised text with the per-text facts the rules need.
struct SentiText<'a> {
    tokens: Vec<&'a str>,
    /// Some, but not all, tokens are ALL CAPS.
    cap_differential: bool,
}

impl<'a> SentiText<'a> {
    /// Whitespace tokens longer than one character, with a single run of
    /// edge punctuation removed from plain words.
    fn new(text: &'a str) -> Self {
        let tokens: Vec<&str> = text
            .split_whitespace()
            .filter(|t| t.chars().count() > 1)
            .map(strip_punctuation)
            .collect();
        let caps = tokens.iter().filter(|t| is_upper(t)).count();
        Self {
            cap_differential: caps > 0 && caps < tokens.len(),
            tokens,
        }
    }
}

/// `!word`, `word,` or `word?!?` become `word` when what remains is longer
/// than one character and holds no punctuation. Anything else, emoticons
/// like `:)` and quoted words like `"great,"` included, is kept as is.
fn strip_punctuation(token: &str) -> &str {
    let plain_word =
        |w: &str| w.chars().count() > 1 && !w.chars().any(|c| c.is_ascii_punctuation());
    PUNCTUATION
        .iter()
        .flat_map(|p| [token.strip_prefix(*p), token.strip_suffix(*p)])
        .flatten()
        .find(|w| plain_word(*w))
        .unwrap_or(token)
}

/// At least one cased character and no lowercase ones.
fn is_upper(token: &str) -> bool {
    let mut cased = false;
    for c in token.chars() {
        if c.is_lowercase() {
            return false;
        }
        if c.is_uppercase() {
            cased = true;
        }
    }
    cased
}

fn is_negation(word: &str) -> bool {
    let word = word.to_lowercase();
    NEGATIONS.contains(&word.as_str()) || word.contains("n't")
}

/// Booster contribution of `word` towards a sentiment of sign `valence`.
fn scalar_inc_dec(word: &str, valence: f64, cap_differential: bool) -> f64 {
    let Some(mut scalar) = booster(&word.to_lowercase()) else {
        return 0.0;
    };
    if valence < 0.0 {
        scalar = -scalar;
    }
    if cap_differential && is_upper(word) {
        if valence > 0.0 {
            scalar += C_INCR;
        } else {
            scalar -= C_INCR;
        }
    }
    scalar
}

/// Negation `start_i + 1` tokens back flips the valence; "never so" and
/// "never this" amplify it instead. The "never"/"so"/"this" match is
/// case-sensitive.
fn never_check(valence: f64, tokens: &[&str], start_i: usize, i: usize) -> f64 {
    let w = |back: usize| tokens[i - back];
    let so_or_this = |word: &str| word == "so" || word == "this";
    match start_i {
        0 if is_negation(w(1)) => valence * N_SCALAR,
        1 => {
            if w(2) == "never" && so_or_this(w(1)) {
                valence * 1.5
            } else if is_negation(w(2)) {
                valence * N_SCALAR
            } else {
                valence
            }
        }
        2 => {
            if (w(3) == "never" && so_or_this(w(2))) || so_or_this(w(1)) {
                valence * 1.25
            } else if is_negation(w(3)) {
                valence * N_SCALAR
            } else {
                valence
            }
        }
        _ => valence,
    }
}

/// Idioms around the token replace its valence; a dampener bigram in front
/// of it lowers it. Matching is case-sensitive and needs three tokens
/// before `i`.
fn idioms_check(mut valence: f64, tokens: &[&str], i: usize) -> f64 {
    let onezero = format!("{} {}", tokens[i - 1], tokens[i]);
    let twoonezero = format!("{} {} {}", tokens[i - 2], tokens[i - 1], tokens[i]);
    let twoone = format!("{} {}", tokens[i - 2], tokens[i - 1]);
    let threetwoone = format!("{} {} {}", tokens[i - 3], tokens[i - 2], tokens[i - 1]);
    let threetwo = format!("{} {}", tokens[i - 3], tokens[i - 2]);

    if let Some(v) = [&onezero, &twoonezero, &twoone, &threetwoone, &threetwo]
        .into_iter()
        .find_map(|seq| special_case(seq))
    {
        valence = v;
    }
    if tokens.len() - 1 > i
        && let Some(v) = special_case(&format!("{} {}", tokens[i], tokens[i + 1]))
    {
        valence = v;
    }
    if tokens.len() - 1 > i + 1
        && let Some(v) =
            special_case(&format!("{} {} {}", tokens[i], tokens[i + 1], tokens[i + 2]))
    {
        valence = v;
    }

    if booster(&threetwo).is_some() || booster(&twoone).is_some() {
        valence += B_DECR;
    }
    valence
}

/// Sentiment before the first "but" is halved; sentiment after it gains
/// half again.
fn but_check(tokens: &[&str], sentiments: &mut [f64]) {
    let Some(bi) = tokens.iter().position(|w| w.to_lowercase() == "but") else {
        return;
    };
    for (si, s) in sentiments.iter_mut().enumerate() {
        if si < bi {
            *s *= 0.5;
        } else if si > bi {
            *s *= 1.5;
        }
    }
}

fn punctuation_emphasis(text: &str) -> f64 {
    let exclamations = text.matches('!').count().min(MAX_EXCLAMATIONS);
    let questions = text.matches('?').count();
    let question_emphasis = match questions {
        0 | 1 => 0.0,
        2 | 3 => questions as f64 * QUESTION_WEIGHT,
        _ => MAX_QUESTION_EMPHASIS,
    };
    exclamations as f64 * EXCLAMATION_WEIGHT + question_emphasis
}

/// Squash an unbounded valence sum into `[-1, 1]`.
fn normalize(score: f64) -> f64 {
    (score / (score * score + ALPHA).sqrt()).clamp(-1.0, 1.0)
}

/// Round to `places` decimals, ties to even on the exact binary value.
/// Float formatting is exact, so this matches Python's `round`.
fn round_to(value: f64, places: usize) -> f64 {
    format!("{value:.places$}").parse().unwrap_or(value)
}

fn score_valence(sentiments: &[f64], text: &str) -> PolarityScores {
    if sentiments.is_empty() {
        return PolarityScores::NEUTRAL;
    }

    let punct = punctuation_emphasis(text);
    // Folding from +0.0 keeps an all-zero sum from coming out as -0.0.
    let mut sum = sentiments.iter().fold(0.0_f64, |acc, &s| acc + s);
    if sum > 0.0 {
        sum += punct;
    } else if sum < 0.0 {
        sum -= punct;
    }
    let compound = normalize(sum);

    // Each sentiment-bearing token counts |valence| + 1 so it outweighs a
    // neutral token, which counts 1.
    let mut pos_sum = 0.0;
    let mut neg_sum = 0.0;
    let mut neu_count = 0usize;
    for &s in sentiments {
        if s > 0.0 {
            pos_sum += s + 1.0;
        } else if s < 0.0 {
            neg_sum += s - 1.0;
        } else {
            neu_count += 1;
        }
    }
    if pos_sum > neg_sum.abs() {
        pos_sum += punct;
    } else if pos_sum < neg_sum.abs() {
        neg_sum -= punct;
    }

    let total = pos_sum + neg_sum.abs() + neu_count as f64;
    let positive = round_to((pos_sum / total).abs(), 3);
    let negative = round_to((neg_sum / total).abs(), 3);
    // Derived rather than rounded independently so the three shares sum to 1.
    let neutral = round_to(1.0 - positive - negative, 3).max(0.0);

    PolarityScores {
        negative,
        neutral,
        positive,
        compound: round_to(compound, 4),
    }
}
