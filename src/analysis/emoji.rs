const ZWJ: char = '\u{200D}';

fn is_regional_indicator(c: char) -> bool {
    ('\u{1F1E6}'..='\u{1F1FF}').contains(&c)
}

/// Code points that attach to the preceding emoji.
fn is_modifier(c: char) -> bool {
    matches!(c,
        '\u{FE0E}' | '\u{FE0F}'          // variation selectors
        | '\u{20E3}'                     // combining keycap
        | '\u{1F3FB}'..='\u{1F3FF}'      // skin tones
        | '\u{E0020}'..='\u{E007F}'      // tag sequences (subdivision flags)
    )
}

/// Approximation of Unicode `Extended_Pictographic`, minus the code points
/// that only ever attach to a base.
fn is_pictographic(c: char) -> bool {
    if is_regional_indicator(c) || is_modifier(c) {
        return false;
    }
    matches!(c,
        '\u{00A9}' | '\u{00AE}' | '\u{203C}' | '\u{2049}' | '\u{2122}' | '\u{2139}'
        | '\u{2194}'..='\u{2199}' | '\u{21A9}'..='\u{21AA}'
        | '\u{231A}'..='\u{231B}' | '\u{2328}' | '\u{23CF}'
        | '\u{23E9}'..='\u{23F3}' | '\u{23F8}'..='\u{23FA}'
        | '\u{24C2}' | '\u{25AA}'..='\u{25AB}' | '\u{25B6}' | '\u{25C0}'
        | '\u{25FB}'..='\u{25FE}'
        | '\u{2600}'..='\u{27BF}'             // misc symbols, dingbats
        | '\u{2934}'..='\u{2935}' | '\u{2B05}'..='\u{2B07}'
        | '\u{2B1B}'..='\u{2B1C}' | '\u{2B50}' | '\u{2B55}'
        | '\u{3030}' | '\u{303D}' | '\u{3297}' | '\u{3299}'
        | '\u{1F000}'..='\u{1FAFF}'           // pictographs, emoticons, food, ...
        | '\u{1FC00}'..='\u{1FFFD}'
    )
}

/// `1`, `#` or `*` only start an emoji as a keycap.
fn is_keycap_base(c: char, next: Option<char>) -> bool {
    matches!(c, '0'..='9' | '#' | '*') && matches!(next, Some('\u{FE0F}' | '\u{20E3}'))
}

/// Byte offset of the first emoji base in `s`.
fn emoji_start(s: &str) -> Option<usize> {
    let mut chars = s.char_indices().peekable();
    while let Some((idx, c)) = chars.next() {
        let next = chars.peek().map(|&(_, n)| n);
        if is_pictographic(c) || is_regional_indicator(c) || is_keycap_base(c, next) {
            return Some(idx);
        }
    }
    None
}

/// Returns the first emoji of `s`, keeping modifier, ZWJ, flag and keycap
/// sequences whole. Text around it is ignored; `None` when there is no emoji.
pub fn first_emoji(s: &str) -> Option<&str> {
    let s = &s[emoji_start(s)?..];
    let mut chars = s.char_indices().peekable();
    let (_, first) = chars.next()?;

    let mut end = first.len_utf8();
    let mut pending_flag = is_regional_indicator(first);
    let mut after_zwj = false;

    while let Some(&(idx, c)) = chars.peek() {
        let attaches = if after_zwj {
            after_zwj = false;
            true
        } else if c == ZWJ {
            after_zwj = true;
            true
        } else if pending_flag && is_regional_indicator(c) {
            pending_flag = false;
            true
        } else {
            is_modifier(c)
        };
        if !attaches {
            break;
        }
        end = idx + c.len_utf8();
        chars.next();
    }

    Some(&s[..end])
}
