/// runnable demonstrations of the VCS reaction adjustment step
pub mod vcs_examples;
