pub mod renewal_loop;
