//! Property tests for the match-replace engine and the context locator.

use proptest::prelude::*;
use regex::Regex;
use retree::replace::context::{line_end, line_start};
use retree::replace::{AcceptAll, MatchContext, MatchSpec, Replacer};

fn literal(search: &str, replace: &str) -> Replacer {
    Replacer::new(&MatchSpec::literal(search, replace)).unwrap()
}

fn line_count(text: &str) -> usize {
    let newlines = text.matches('\n').count();
    if text.is_empty() || text.ends_with('\n') {
        newlines
    } else {
        newlines + 1
    }
}

proptest! {
    #[test]
    fn no_occurrence_means_no_callback_and_no_change(text in "[abc\n ]{0,80}", search in "[xyz]{1,3}") {
        let replacer = literal(&search, "REPL");
        let mut calls = 0;
        let result = replacer.execute(&text, &mut |_: &MatchContext| {
            calls += 1;
            true
        });
        prop_assert_eq!(calls, 0);
        prop_assert_eq!(&result, &text);
        prop_assert_eq!(replacer.execute(&result, &mut AcceptAll), result);
    }

    #[test]
    fn accepting_everything_is_a_plain_substitution(
        text in "[ab\n]{0,80}",
        search in "[ab]{1,3}",
        replace in "[a-z]{0,4}",
    ) {
        let replacer = literal(&search, &replace);
        prop_assert_eq!(replacer.execute(&text, &mut AcceptAll), text.replace(&search, &replace));
        prop_assert_eq!(replacer.replace_all(&text), text.replace(&search, &replace));
    }

    #[test]
    fn accepting_everything_matches_regex_replace_all(
        text in "[ab\n x]{0,60}",
        pattern in prop::sample::select(vec![
            "a*", "b+", "a|b*", "x*", "(ab)*", "a?b?", r"\b", "^a", "a$", "(?m)^", "",
        ]),
        replace in prop::sample::select(vec!["-", "[$0]", "", "${0}${0}"]),
    ) {
        let replacer = Replacer::new(&MatchSpec::regex(pattern, replace)).unwrap();
        let expected = Regex::new(pattern).unwrap().replace_all(&text, replace).into_owned();

        let mut calls = 0;
        let result = replacer.execute(&text, &mut |_: &MatchContext| {
            calls += 1;
            true
        });
        prop_assert_eq!(&result, &expected);
        prop_assert_eq!(calls, Regex::new(pattern).unwrap().find_iter(&text).count());
        prop_assert_eq!(replacer.replace_all(&text), expected);
    }

    #[test]
    fn rejecting_everything_keeps_the_input(text in "[ab\n]{0,80}", search in "[ab]{1,3}") {
        let replacer = literal(&search, "zz");
        let result = replacer.execute(&text, &mut |_: &MatchContext| false);
        prop_assert_eq!(result, text);
    }

    #[test]
    fn context_holds_at_most_three_lines_each_side(text in "[ab\n]{0,120}", search in "[ab]{1,2}") {
        let replacer = literal(&search, "Q");
        let starts: Vec<(usize, usize)> = text
            .match_indices(search.as_str())
            .map(|(i, m)| (i, i + m.len()))
            .collect();

        let mut seen = Vec::new();
        replacer.execute(&text, &mut |ctx: &MatchContext| {
            seen.push(ctx.clone());
            false
        });

        prop_assert_eq!(seen.len(), starts.len());
        for (ctx, (start, end)) in seen.iter().zip(starts) {
            let before = text[..line_start(&text, start)].matches('\n').count().min(3);
            let after = line_count(&text[line_end(&text, end)..]).min(3);
            prop_assert_eq!(ctx.lines_before.matches('\n').count(), before);
            prop_assert_eq!(line_count(&ctx.lines_after), after);
            prop_assert_eq!(&ctx.match_text, &search);
        }
    }
}

#[test]
fn literal_metacharacters_match_themselves() {
    assert_eq!(literal("fo{2}", "X").replace_all("fo{2}o foo"), "Xo foo");

    let regex = Replacer::new(&MatchSpec::regex("fo{2}", "X")).unwrap();
    assert_eq!(regex.replace_all("fo{2}o foo"), "fo{2}o X");
}
