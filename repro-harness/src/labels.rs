use rand::Rng;

pub const ADJECTIVES: [&str; 25] = [
    "pretty",
    "large",
    "big",
    "small",
    "tall",
    "short",
    "long",
    "handsome",
    "plain",
    "quaint",
    "clean",
    "elegant",
    "easy",
    "angry",
    "crazy",
    "helpful",
    "mushy",
    "odd",
    "unsightly",
    "adorable",
    "important",
    "inexpensive",
    "cheap",
    "expensive",
    "fancy",
];

// "brown" appears twice, so it comes up twice as often as the other colors
pub const COLORS: [&str; 11] = [
    "red", "yellow", "blue", "green", "pink", "brown", "purple", "brown", "white", "black", "orange",
];

pub const NOUNS: [&str; 13] = [
    "table", "chair", "house", "bbq", "desk", "car", "pony", "cookie", "sandwich", "burger",
    "pizza", "mouse", "keyboard",
];

/// An adjective, a color and a noun, each picked uniformly, joined by single spaces.
pub fn random_label<R: Rng + ?Sized>(rng: &mut R) -> String {
    let adjective = pick(rng, &ADJECTIVES);
    let color = pick(rng, &COLORS);
    let noun = pick(rng, &NOUNS);
    format!("{adjective} {color} {noun}")
}

fn pick<'a, R: Rng + ?Sized>(rng: &mut R, words: &[&'a str]) -> &'a str {
    words[rng.random_range(0..words.len())]
}

/// Whether `label` could have come out of [`random_label`].
pub fn is_label(label: &str) -> bool {
    let mut parts = label.split(' ');
    let (Some(adjective), Some(color), Some(noun), None) =
        (parts.next(), parts.next(), parts.next(), parts.next())
    else {
        return false;
    };
    ADJECTIVES.contains(&adjective) && COLORS.contains(&color) && NOUNS.contains(&noun)
}
