use iced::widget::{column, container, row, text};
use iced::{Center, Element, Fill, Pixels};

pub fn logo<'a, Message>(size: impl Into<Pixels>) -> Element<'a, Message> {
    const PKG_NAME: &str = env!("CARGO_PKG_NAME");

    let mut name = String::with_capacity(PKG_NAME.len());
    name.push(
        PKG_NAME
            .chars()
            .next()
            .expect("Non-empty name")
            .to_ascii_uppercase(),
    );
    name.push_str(&PKG_NAME[1..]);

    text(name).size(size).into()
}

/// A titled box of `label: value` rows.
pub fn table<'a, Message: 'a>(
    title: &'a str,
    rows: impl IntoIterator<Item = (&'a str, String)>,
) -> Element<'a, Message> {
    let rows = column(rows.into_iter().map(|(label, value)| {
        row![text(label).size(12).width(120), text(value).size(12)]
            .spacing(10)
            .align_y(Center)
            .into()
    }))
    .spacing(5);

    container(column![text(title).size(14), rows].spacing(10))
        .width(Fill)
        .padding(10)
        .style(container::bordered_box)
        .into()
}

/// Joins names for display, or "None" when there are none.
pub fn list<T: ToString>(items: impl IntoIterator<Item = T>) -> String {
    let items: Vec<_> = items.into_iter().map(|item| item.to_string()).collect();

    if items.is_empty() {
        "None".to_owned()
    } else {
        items.join(", ")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lists_fall_back_to_none() {
        assert_eq!(list(Vec::<String>::new()), "None");
        assert_eq!(list(["blaze", "solar-power"]), "blaze, solar-power");
    }
}
