//! Basic usage of the `pooled_list` crate:
//!
//! * Creating a list with a fixed capacity.
//! * Adding items at the ends and next to other items.
//! * Walking the list by position in both directions.
//! * Erasing items while walking backward.

use pooled_list::ValueList;

fn main() {
    let mut list = ValueList::<u32, 8>::new();

    list.push_back(10);
    list.push_back(30);
    let forty = list.push_back(40);

    // Positions stay valid while other items come and go.
    let twenty = list.insert(list.prev(forty), 20);
    list.insert_after(forty, 50);
    list.push_front(0);

    println!(
        "List holds {} of {} items: {:?}",
        list.len(),
        list.capacity(),
        list
    );
    println!("Item before 20 is {}", list.value(list.prev(twenty)));

    // Erasing returns the predecessor, so a backward walk can keep going.
    let mut position = list.rbegin();
    while !position.is_end() {
        if list.value(position) % 20 == 0 {
            position = list.erase(position);
        } else {
            position = list.prev(position);
        }
    }

    println!("After erasing multiples of 20: {list:?}");

    list.clear();
    println!("After clearing, the list is empty: {}", list.is_empty());
}
