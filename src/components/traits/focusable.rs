/// Widgets that look different while they have the user's attention
pub trait Focusable {
    fn set_enabled(&mut self, enable: bool);
}
