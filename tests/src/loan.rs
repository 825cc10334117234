mod alignment;
mod concurrency;
mod scenarios;
