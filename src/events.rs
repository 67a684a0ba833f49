use bat::PrettyPrinter;
use console::style;

/// Display slot for a conversation event.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Category {
    User,
    Agent,
    Tool,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Severity {
    Success,
    Warning,
    Danger,
}

/// Presentation boundary. The loop and the tools emit display events here
/// and never render anything themselves.
pub trait EventSink: Send + Sync {
    /// A conversation turn or a piece of tool output.
    fn message(&self, sender: &str, text: &str, category: Category);

    /// An operational notice outside the conversation itself.
    fn alert(&self, text: &str, severity: Severity);
}

/// Renders events to the terminal.
pub struct ConsoleSink;

impl EventSink for ConsoleSink {
    fn message(&self, sender: &str, text: &str, category: Category) {
        match category {
            Category::User => println!("{}: {}", style(sender).cyan().bold(), text),
            Category::Tool => println!("{}: {}", style(sender).magenta().bold(), text),
            Category::Agent => {
                println!("{}:", style(sender).green().bold());
                render_markdown(text);
            }
        }
    }

    fn alert(&self, text: &str, severity: Severity) {
        match severity {
            Severity::Success => println!("{}", style(text).green()),
            Severity::Warning => println!("{}", style(text).yellow()),
            Severity::Danger => eprintln!("{}", style(text).red().bold()),
        }
    }
}

fn render_markdown(text: &str) {
    let printed = PrettyPrinter::new()
        .input_from_bytes(text.as_bytes())
        .language("markdown")
        .print();
    if printed.is_err() {
        println!("{text}");
    }
}

#[cfg(test)]
pub use recording::{Event, RecordingSink};
