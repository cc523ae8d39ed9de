//! Built-in metric definitions for the prompt's definitions block

/// Used when a metric has no entry below
pub const UNKNOWN_DEFINITION: &str = "No definition is available for this metric.";

/// Definition text for a raw metric id
pub fn definition(metric: &str) -> &'static str {
    match metric {
        // OS
        "cpu_usage" => "Percentage of total CPU time spent doing work (user + system).",
        "cpu_usage_max" => "Highest CPU usage percentage among all cores in the interval.",
        "cpu_user" => "Percentage of CPU time spent running user-space processes.",
        "cpu_system" => "Percentage of CPU time spent running the kernel.",
        "cpu_idle" => "Percentage of CPU time spent idle.",
        "cpu_iowait" => "Percentage of CPU time spent waiting for I/O to complete.",
        "load_avg_1m" | "load_avg" => "Average number of runnable processes over the last minute.",
        "mem_usage" | "memory_usage" => "Percentage of physical memory in use.",
        "mem_used" => "Amount of physical memory in use.",
        "swap_used" => "Amount of swap space in use.",
        "swap_usage" => "Percentage of swap space in use.",
        "disk_usage" => "Percentage of filesystem capacity in use.",
        "disk_read_bytes_delta" => "Bytes read from disk during the interval.",
        "disk_write_bytes_delta" => "Bytes written to disk during the interval.",
        "network" => "Overall network throughput of the host.",
        "rx_bytes_delta" => "Bytes received on network interfaces during the interval.",
        "tx_bytes_delta" => "Bytes transmitted on network interfaces during the interval.",
        "rx_errors_delta" => "Receive errors on network interfaces during the interval.",
        "tx_errors_delta" => "Transmit errors on network interfaces during the interval.",
        "rx_dropped_delta" => "Received packets dropped during the interval.",
        "tx_dropped_delta" => "Transmitted packets dropped during the interval.",
        "process_count" => "Number of processes running on the host.",

        // WAS
        "heap_usage" => "Percentage of the JVM heap in use.",
        "heap_used" => "Amount of JVM heap memory in use.",
        "gc_time" => "Time spent in garbage collection during the interval.",
        "gc_count" => "Number of garbage collections during the interval.",
        "thread_count" => "Number of live threads in the application server.",
        "active_txns" | "active_transaction" => "Number of transactions currently executing.",
        "tps" => "Transactions processed per second.",
        "response_time" => "Average response time of requests.",
        "request_count" => "Number of requests received during the interval.",
        "error_count" => "Number of failed requests during the interval.",
        "jdbc_active" | "active_db_connections" => "Number of JDBC connections in use.",

        // DB
        "active_sessions" | "active_session_count" => "Number of sessions actively executing in the database.",
        "lock_waiting_sessions" | "lock_wait_sessions" => "Number of sessions waiting to acquire a lock.",
        "db_cpu" => "CPU time consumed by the database.",
        "logical_reads" => "Number of logical block reads.",
        "physical_reads" => "Number of block reads from disk.",
        "execute_count" => "Number of SQL executions.",
        "commit_count" => "Number of committed transactions.",
        "wait_time" => "Time sessions spent waiting on database events.",

        // Service
        "elapse_avg" => "Average end-to-end elapsed time of the transaction.",
        "elapse_max" => "Maximum end-to-end elapsed time of the transaction.",
        "exec_count" => "Number of executions of the transaction.",
        "error_rate" => "Ratio of failed executions of the transaction.",
        m if m.starts_with("elapse") && m.ends_with("_avg") => {
            "Average elapsed time of one processing section of the transaction."
        }
        m if m.starts_with("sql_elapse") => "Elapsed time of SQL execution within the transaction.",

        _ => UNKNOWN_DEFINITION,
    }
}
