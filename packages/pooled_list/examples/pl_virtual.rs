//! Holding items of different types in one list, viewed through a common trait:
//!
//! * Declaring which types can be viewed as the trait object.
//! * Inserting items of different concrete types.
//! * Reserving a slot and writing an item that knows its own position.

use pooled_list::{VirtualList, impl_as_dyn};

trait Job {
    fn describe(&self) -> String;
}

struct Print {
    text: &'static str,
}

struct Retry {
    slot: usize,
    attempts: u8,
}

impl Job for Print {
    fn describe(&self) -> String {
        format!("print {:?}", self.text)
    }
}

impl Job for Retry {
    fn describe(&self) -> String {
        format!("retry slot {} up to {} times", self.slot, self.attempts)
    }
}

impl_as_dyn!(dyn Job => Print, Retry);

fn main() {
    let mut jobs = VirtualList::<dyn Job, 16, 32>::new();

    jobs.push_back(Print { text: "hello" });
    jobs.push_back(Print { text: "world" });

    // The slot index is known before the item is created.
    let slot = jobs.push_front_raw();
    let index = slot.index();
    slot.write(Retry {
        slot: index,
        attempts: 3,
    });

    for job in &jobs {
        println!("{}", job.describe());
    }

    let last = jobs.rbegin();
    jobs.erase(last);

    println!("{} jobs remain", jobs.len());
}
