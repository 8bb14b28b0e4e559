use rand::Rng;

const WORDS: &[&str] = &[
    "lorem", "ipsum", "dolor", "sit", "amet", "consectetur", "adipiscing", "elit", "sed", "do",
    "eiusmod", "tempor", "incididunt", "ut", "labore", "et", "dolore", "magna", "aliqua", "enim",
    "ad", "minim", "veniam", "quis", "nostrud", "exercitation", "ullamco", "laboris", "nisi",
    "aliquip", "ex", "ea", "commodo", "consequat",
];

pub const TAGS: &[&str] = &["fake", "data", "rust", "blog", "tutorial"];

pub fn sentence<R: Rng + ?Sized>(rng: &mut R, words: usize) -> String {
    let mut out: Vec<&str> = (0..words)
        .map(|_| WORDS[rng.random_range(0..WORDS.len())])
        .collect();

    if out.is_empty() {
        out.push(WORDS[0]);
    }

    let mut s = out.join(" ");
    if let Some(first) = s.get_mut(0..1) {
        first.make_ascii_uppercase();
    }
    s.push('.');
    s
}

/// A few paragraphs, long enough that listings show the shortened preview.
pub fn body<R: Rng + ?Sized>(rng: &mut R) -> String {
    let paragraphs = rng.random_range(3..5);

    (0..paragraphs)
        .map(|_| {
            let sentences = rng.random_range(4..7);
            (0..sentences)
                .map(|_| {
                    let words = rng.random_range(8..15);
                    sentence(rng, words)
                })
                .collect::<Vec<_>>()
                .join(" ")
        })
        .collect::<Vec<_>>()
        .join("\n\n")
}

pub fn tags<R: Rng + ?Sized>(rng: &mut R) -> Vec<String> {
    let count = rng.random_range(1..=2);
    let mut picked: Vec<String> = Vec::with_capacity(count);

    while picked.len() < count {
        let tag = TAGS[rng.random_range(0..TAGS.len())];
        if !picked.iter().any(|t| t == tag) {
            picked.push(tag.to_string());
        }
    }

    picked
}
