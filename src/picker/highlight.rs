use regex::RegexBuilder;

/// A piece of a name, emphasized when it matches the search text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Fragment<'a> {
    pub text: &'a str,
    pub emphasized: bool,
}

/// Split `text` around every case-insensitive occurrence of `term`.
///
/// The term is matched literally. An empty term yields the whole text unemphasized.
pub fn highlight<'a>(text: &'a str, term: &str) -> Vec<Fragment<'a>> {
    if text.is_empty() {
        return Vec::new();
    }
    let plain = vec![Fragment {
        text,
        emphasized: false,
    }];
    if term.is_empty() {
        return plain;
    }

    let pattern = match RegexBuilder::new(&regex::escape(term))
        .case_insensitive(true)
        .build()
    {
        Ok(pattern) => pattern,
        Err(error) => {
            log::warn!("Cannot highlight {:?}: {}", term, error);
            return plain;
        }
    };

    let mut fragments = Vec::new();
    let mut last = 0;
    for found in pattern.find_iter(text) {
        if found.start() > last {
            fragments.push(Fragment {
                text: &text[last..found.start()],
                emphasized: false,
            });
        }
        fragments.push(Fragment {
            text: found.as_str(),
            emphasized: true,
        });
        last = found.end();
    }
    if last < text.len() {
        fragments.push(Fragment {
            text: &text[last..],
            emphasized: false,
        });
    }
    fragments
}
