use std::{borrow::Cow, cell::RefCell, cmp::Ordering, fmt, str::FromStr};

use feruca::{Collator, Locale, Tailoring};
use serde::{Deserialize, Serialize};

use crate::{Question, QuestionId, User};

/// A sortable attribute of a [`Question`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SortField {
    /// The question's identifier, in the order of its hyphenated text.
    Id,
    /// The platform link, compared as text.
    PlatformLink,
    /// The level, compared by its name (`Easy` < `Hard` < `Medium`).
    Level,
    /// The topic, compared as text.
    Topic,
    /// Puneet's completion flag.
    CompletedByPuneet,
    /// Komal's completion flag.
    CompletedByKomal,
    /// The creation timestamp.
    CreatedAt,
}

impl SortField {
    /// Every sortable field.
    pub const ALL: [Self; 7] = [
        Self::Id,
        Self::PlatformLink,
        Self::Level,
        Self::Topic,
        Self::CompletedByPuneet,
        Self::CompletedByKomal,
        Self::CreatedAt,
    ];

    /// The attribute name, as it appears in the serialized question.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Id => "id",
            Self::PlatformLink => "platformLink",
            Self::Level => "level",
            Self::Topic => "topic",
            Self::CompletedByPuneet => "completedByPuneet",
            Self::CompletedByKomal => "completedByKomal",
            Self::CreatedAt => "createdAt",
        }
    }

    /// Looks up a field by attribute name.
    ///
    /// Matching ignores ASCII case, `-` and `_`, so `createdAt`,
    /// `created-at` and `created_at` all name [`SortField::CreatedAt`].
    /// Empty or unknown names yield `None`.
    #[must_use]
    pub fn parse(name: &str) -> Option<Self> {
        let wanted = normalise(name);
        if wanted.is_empty() {
            return None;
        }
        Self::ALL
            .into_iter()
            .find(|field| normalise(field.name()) == wanted)
    }

    /// Extracts this field's value from `question`.
    #[must_use]
    pub fn value(self, question: &Question) -> FieldValue<'_> {
        match self {
            Self::Id => FieldValue::Id(question.id()),
            Self::PlatformLink => FieldValue::Text(Cow::Borrowed(question.platform_link().as_str())),
            Self::Level => FieldValue::Text(Cow::Borrowed(question.level().as_str())),
            Self::Topic => FieldValue::Text(Cow::Borrowed(question.topic().as_str())),
            Self::CompletedByPuneet => FieldValue::Flag(question.is_completed_by(User::Puneet)),
            Self::CompletedByKomal => FieldValue::Flag(question.is_completed_by(User::Komal)),
            Self::CreatedAt => FieldValue::Number(question.created_at()),
        }
    }
}

fn normalise(name: &str) -> String {
    name.chars()
        .filter(|c| *c != '-' && *c != '_')
        .map(|c| c.to_ascii_lowercase())
        .collect()
}

impl fmt::Display for SortField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// The value of a [`SortField`] for one question.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldValue<'a> {
    /// A question identifier.
    Id(QuestionId),
    /// A string attribute.
    Text(Cow<'a, str>),
    /// A numeric attribute.
    Number(i64),
    /// A boolean attribute.
    Flag(bool),
}

/// Compares two field values in ascending order.
///
/// Text uses the Unicode collation algorithm with the root locale: accents
/// and case only break ties, and lowercase sorts before uppercase. Ids
/// compare like their lowercase hyphenated text. Numbers compare
/// numerically and `true` sorts after `false`. Values of different kinds
/// compare equal.
#[must_use]
pub fn compare_values(a: &FieldValue<'_>, b: &FieldValue<'_>) -> Ordering {
    match (a, b) {
        (FieldValue::Text(a), FieldValue::Text(b)) => locale_cmp(a, b),
        // Fixed-width lowercase hex, so byte order matches text order.
        (FieldValue::Id(a), FieldValue::Id(b)) => {
            a.as_uuid().as_bytes().cmp(b.as_uuid().as_bytes())
        }
        (FieldValue::Number(a), FieldValue::Number(b)) => a.cmp(b),
        (FieldValue::Flag(a), FieldValue::Flag(b)) => a.cmp(b),
        _ => Ordering::Equal,
    }
}

thread_local! {
    // Punctuation is non-ignorable; canonically equal strings fall back to byte order.
    static COLLATOR: RefCell<Collator> =
        RefCell::new(Collator::new(Tailoring::Cldr(Locale::Root), false, true));
}

fn locale_cmp(a: &str, b: &str) -> Ordering {
    COLLATOR
        .with_borrow_mut(|collator| collator.collate(a, b))
        .then_with(|| a.cmp(b))
}

/// Direction of a sort.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortDirection {
    /// Smallest first.
    #[default]
    Asc,
    /// Largest first.
    Desc,
}

impl SortDirection {
    /// The opposite direction.
    #[must_use]
    pub const fn reversed(self) -> Self {
        match self {
            Self::Asc => Self::Desc,
            Self::Desc => Self::Asc,
        }
    }

    /// Orients an ascending `ordering` in this direction.
    #[must_use]
    pub const fn apply(self, ordering: Ordering) -> Ordering {
        match self {
            Self::Asc => ordering,
            Self::Desc => ordering.reverse(),
        }
    }
}

impl fmt::Display for SortDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Asc => "asc",
            Self::Desc => "desc",
        })
    }
}

impl FromStr for SortDirection {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "asc" => Ok(Self::Asc),
            "desc" => Ok(Self::Desc),
            _ => Err(format!("unknown sort direction: {s}")),
        }
    }
}

/// The field and direction used to order the filtered list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct SortCriteria {
    /// Field to sort by; `None` keeps the input order.
    pub field: Option<SortField>,
    /// Sort direction.
    pub direction: SortDirection,
}

impl SortCriteria {
    /// Sort criteria for `field` in `direction`.
    #[must_use]
    pub const fn new(field: Option<SortField>, direction: SortDirection) -> Self {
        Self { field, direction }
    }

    /// Criteria that keep the input order.
    #[must_use]
    pub const fn unsorted() -> Self {
        Self::new(None, SortDirection::Asc)
    }

    /// The criteria after the user picks `field`.
    ///
    /// Picking the current field flips the direction; picking any other field
    /// sorts by it ascending.
    #[must_use]
    pub fn select(self, field: SortField) -> Self {
        if self.field == Some(field) {
            Self::new(self.field, self.direction.reversed())
        } else {
            Self::new(Some(field), SortDirection::Asc)
        }
    }

    /// Compares two questions under these criteria.
    #[must_use]
    pub fn compare(&self, a: &Question, b: &Question) -> Ordering {
        self.field.map_or(Ordering::Equal, |field| {
            self.direction
                .apply(compare_values(&field.value(a), &field.value(b)))
        })
    }

    /// Sorts `questions` in place.
    ///
    /// The sort is stable, so questions with equal keys keep their relative
    /// order and sorting an already sorted list changes nothing.
    pub fn sort(&self, questions: &mut [&Question]) {
        if self.field.is_none() {
            return;
        }
        questions.sort_by(|a, b| self.compare(a, b));
    }
}

#[cfg(test)]
mod tests {
    use test_case::test_case;

    use super::*;
    use crate::{
        Level,
        query::fixtures::{collection, question},
    };

    fn sorted<'a>(collection: &'a [Question], criteria: SortCriteria) -> Vec<&'a Question> {
        let mut questions: Vec<&Question> = collection.iter().collect();
        criteria.sort(&mut questions);
        questions
    }

    fn created(questions: &[&Question]) -> Vec<i64> {
        questions.iter().map(|q| q.created_at()).collect()
    }

    #[test_case("createdAt", Some(SortField::CreatedAt); "camel case")]
    #[test_case("created_at", Some(SortField::CreatedAt); "snake case")]
    #[test_case("created-at", Some(SortField::CreatedAt); "kebab case")]
    #[test_case("platformLink", Some(SortField::PlatformLink); "platform link")]
    #[test_case("completedByKomal", Some(SortField::CompletedByKomal); "flag")]
    #[test_case("", None; "empty")]
    #[test_case("difficulty", None; "unknown")]
    fn field_parsing(input: &str, expected: Option<SortField>) {
        assert_eq!(SortField::parse(input), expected);
    }

    #[test]
    fn no_field_keeps_input_order() {
        let collection = collection();
        let result = sorted(&collection, SortCriteria::new(None, SortDirection::Desc));
        assert_eq!(created(&result), vec![1, 2, 3, 4]);
    }

    #[test]
    fn created_at_sorts_numerically() {
        let collection = vec![
            question("https://a.dev/1", Level::Easy, "A", 100),
            question("https://a.dev/2", Level::Easy, "A", 9),
            question("https://a.dev/3", Level::Easy, "A", 20),
        ];

        let asc = sorted(
            &collection,
            SortCriteria::new(Some(SortField::CreatedAt), SortDirection::Asc),
        );
        assert_eq!(created(&asc), vec![9, 20, 100]);

        let desc = sorted(
            &collection,
            SortCriteria::new(Some(SortField::CreatedAt), SortDirection::Desc),
        );
        assert_eq!(created(&desc), vec![100, 20, 9]);
    }

    #[test]
    fn level_sorts_by_name_not_difficulty() {
        let collection = vec![
            question("https://a.dev/1", Level::Hard, "A", 1),
            question("https://a.dev/2", Level::Easy, "A", 2),
            question("https://a.dev/3", Level::Medium, "A", 3),
        ];

        let result = sorted(
            &collection,
            SortCriteria::new(Some(SortField::Level), SortDirection::Asc),
        );
        let levels: Vec<&str> = result.iter().map(|q| q.level().as_str()).collect();

        assert_eq!(levels, vec!["Easy", "Hard", "Medium"]);
    }

    #[test]
    fn text_sort_ignores_case_first() {
        let collection = vec![
            question("https://a.dev/1", Level::Easy, "graphs", 1),
            question("https://a.dev/2", Level::Easy, "Arrays", 2),
            question("https://a.dev/3", Level::Easy, "Graphs", 3),
            question("https://a.dev/4", Level::Easy, "arrays", 4),
            question("https://a.dev/5", Level::Easy, "Backtracking", 5),
        ];

        let result = sorted(
            &collection,
            SortCriteria::new(Some(SortField::Topic), SortDirection::Asc),
        );
        let topics: Vec<&str> = result.iter().map(|q| q.topic().as_str()).collect();

        assert_eq!(topics, vec!["arrays", "Arrays", "Backtracking", "graphs", "Graphs"]);
    }

    #[test]
    fn accented_text_sorts_with_its_base_letter() {
        let collection = vec![
            question("https://a.dev/1", Level::Easy, "Backtracking", 1),
            question("https://a.dev/2", Level::Easy, "Árboles", 2),
            question("https://a.dev/3", Level::Easy, "Zeta", 3),
            question("https://a.dev/4", Level::Easy, "Fenwick", 4),
            question("https://a.dev/5", Level::Easy, "Énumération", 5),
        ];

        let result = sorted(
            &collection,
            SortCriteria::new(Some(SortField::Topic), SortDirection::Asc),
        );
        let topics: Vec<&str> = result.iter().map(|q| q.topic().as_str()).collect();

        assert_eq!(
            topics,
            vec!["Árboles", "Backtracking", "Énumération", "Fenwick", "Zeta"]
        );
    }

    #[test_case("~tilde", "apple"; "tilde")]
    #[test_case("{brace", "apple"; "brace")]
    #[test_case("|pipe", "apple"; "pipe")]
    #[test_case("9 ways", "apple"; "digit")]
    fn symbols_and_digits_sort_before_letters(first: &str, second: &str) {
        assert_eq!(
            compare_values(
                &FieldValue::Text(Cow::Borrowed(first)),
                &FieldValue::Text(Cow::Borrowed(second))
            ),
            Ordering::Less
        );
    }

    #[test]
    fn ids_sort_like_their_text() {
        let mut ids: Vec<QuestionId> = (0..32).map(|_| QuestionId::random()).collect();
        let mut by_text = ids.clone();
        by_text.sort_by_cached_key(ToString::to_string);

        ids.sort_by(|a, b| compare_values(&FieldValue::Id(*a), &FieldValue::Id(*b)));

        assert_eq!(ids, by_text);
    }

    #[test]
    fn true_sorts_after_false() {
        let collection = collection();

        let asc = sorted(
            &collection,
            SortCriteria::new(Some(SortField::CompletedByPuneet), SortDirection::Asc),
        );
        assert_eq!(created(&asc), vec![2, 3, 1, 4]);

        let desc = sorted(
            &collection,
            SortCriteria::new(Some(SortField::CompletedByPuneet), SortDirection::Desc),
        );
        assert_eq!(created(&desc), vec![1, 4, 2, 3]);
    }

    #[test]
    fn equal_keys_keep_input_order_in_both_directions() {
        let collection = vec![
            question("https://a.dev/1", Level::Easy, "Same", 1),
            question("https://a.dev/2", Level::Easy, "Same", 2),
            question("https://a.dev/3", Level::Easy, "Same", 3),
        ];

        for direction in [SortDirection::Asc, SortDirection::Desc] {
            let result = sorted(
                &collection,
                SortCriteria::new(Some(SortField::Topic), direction),
            );
            assert_eq!(created(&result), vec![1, 2, 3]);
        }
    }

    #[test]
    fn sorting_is_idempotent() {
        let collection = collection();

        for field in SortField::ALL {
            for direction in [SortDirection::Asc, SortDirection::Desc] {
                let criteria = SortCriteria::new(Some(field), direction);
                let mut once = sorted(&collection, criteria);
                let expected = once.clone();
                criteria.sort(&mut once);
                assert_eq!(once, expected, "{field} {direction}");
            }
        }
    }

    #[test]
    fn selecting_the_same_field_twice_returns_to_ascending() {
        let start = SortCriteria::new(Some(SortField::Topic), SortDirection::Asc);

        let once = start.select(SortField::Topic);
        assert_eq!(once.direction, SortDirection::Desc);

        let twice = once.select(SortField::Topic);
        assert_eq!(twice, start);
    }

    #[test]
    fn selecting_a_new_field_resets_to_ascending() {
        let start = SortCriteria::new(Some(SortField::CreatedAt), SortDirection::Desc);

        let next = start.select(SortField::Level);

        assert_eq!(
            next,
            SortCriteria::new(Some(SortField::Level), SortDirection::Asc)
        );
        assert_eq!(
            SortCriteria::unsorted().select(SortField::Topic),
            SortCriteria::new(Some(SortField::Topic), SortDirection::Asc)
        );
    }

    #[test]
    fn incompatible_values_compare_equal() {
        let text = FieldValue::Text(Cow::Borrowed("Arrays"));
        let number = FieldValue::Number(7);
        let flag = FieldValue::Flag(true);

        assert_eq!(compare_values(&text, &number), Ordering::Equal);
        assert_eq!(compare_values(&number, &flag), Ordering::Equal);
        assert_eq!(compare_values(&flag, &text), Ordering::Equal);
    }

    #[test]
    fn compatible_values_compare_by_kind() {
        assert_eq!(
            compare_values(&FieldValue::Number(2), &FieldValue::Number(10)),
            Ordering::Less
        );
        assert_eq!(
            compare_values(&FieldValue::Flag(true), &FieldValue::Flag(false)),
            Ordering::Greater
        );
        assert_eq!(
            compare_values(
                &FieldValue::Text(Cow::Borrowed("Easy")),
                &FieldValue::Text(Cow::Borrowed("Hard"))
            ),
            Ordering::Less
        );
    }
}
