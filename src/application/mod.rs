pub mod reminder;

#[cfg(test)]
mod reminder_tests;
