/// Separator between the type-derived prefix and the uniqueness counter.
pub const GENERATED_NAME_SEPARATOR: char = '#';

/// Derives a bean name from `type_name`: `"{type_name}#{n}"` with the smallest `n`
/// for which `is_taken` answers `false`.
pub(crate) fn generate_name(type_name: &str, is_taken: impl Fn(&str) -> bool) -> String {
    let mut counter = 0usize;
    loop {
        let candidate = format!("{type_name}{GENERATED_NAME_SEPARATOR}{counter}");
        if !is_taken(&candidate) {
            return candidate;
        }
        counter += 1;
    }
}
