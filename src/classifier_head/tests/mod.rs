mod head_test;
