/// A column list: a single string used verbatim, or several names joined
/// with `,`.
pub trait IntoColumns {
    fn into_columns(self) -> String;
}

impl IntoColumns for &str {
    fn into_columns(self) -> String {
        self.to_string()
    }
}

impl IntoColumns for String {
    fn into_columns(self) -> String {
        self
    }
}

impl IntoColumns for &String {
    fn into_columns(self) -> String {
        self.clone()
    }
}

impl IntoColumns for &[&str] {
    fn into_columns(self) -> String {
        self.join(",")
    }
}

impl IntoColumns for &[String] {
    fn into_columns(self) -> String {
        self.join(",")
    }
}

impl<const N: usize> IntoColumns for [&str; N] {
    fn into_columns(self) -> String {
        self.join(",")
    }
}

impl IntoColumns for Vec<&str> {
    fn into_columns(self) -> String {
        self.join(",")
    }
}

impl IntoColumns for Vec<String> {
    fn into_columns(self) -> String {
        self.join(",")
    }
}
