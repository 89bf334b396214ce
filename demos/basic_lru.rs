//! Minimal LRU walkthrough: recency order decides who gets evicted.
//!
//! Run with: `cargo run --example basic_lru`

use hotset::policy::lru::LruCore;
use hotset::traits::PolicyCache;

fn main() {
    let mut cache = LruCore::new(3);

    cache.put("one", 1);
    cache.put("two", 2);
    cache.put("three", 3);
    println!("filled: len = {}", cache.len());

    // Touch "one" so it is no longer the eviction victim.
    println!("get(one) = {:?}", cache.get(&"one"));

    // Inserting a fourth entry displaces "two", the least recently used.
    cache.put("four", 4);
    for key in ["one", "two", "three", "four"] {
        println!("contains({key}) = {}", cache.contains(&key));
    }

    let mut out = 0;
    if cache.get_into(&"four", &mut out) {
        println!("get_into(four) wrote {out}");
    }
    println!("get_or_default(missing) = {}", cache.get_or_default(&"nope"));
}
