use crate::domain::ports::Navigator;

/// Prints `redirect: <destination>` to stdout in place of a browser redirect.
#[derive(Debug, Default, Clone, Copy)]
pub struct ConsoleNavigator;

impl Navigator for ConsoleNavigator {
    fn navigate(&self, destination: &str) {
        println!("redirect: {destination}");
    }
}
